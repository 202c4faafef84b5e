//=========================================================================
// Presentation Stack
//=========================================================================
//
// Manages entry registration, stack ordering, and structural requests.
//
// Entries are stored in a HashMap by id and referenced via an ordered
// vector of ids (bottom → top). Ordering is by layer, then insertion:
// a new entry is appended to the tail of its layer run.
//
// Lifecycle stepping lives in `lifecycle.rs`; command routing lives in
// `core::command::router`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::task::Poll;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::entry::{EntryInfo, IdAllocator, PresentableEntry};
use super::handle::{resolve, CancellationToken, DismissSignal, PresentHandle, PresentOutcome};
use super::lifecycle::{EntryState, Stage};
use super::request_queue::{PresentRequest, RequestQueue, StackRequest};
use super::{
    ControllerKind, ControllerRegistry, EntryId, FactoryContext, PopTarget, PresentFlags,
    PresentOptions,
};
use crate::core::args::Args;
use crate::core::error::{ControllerFault, Hook, StackError, StackResult};
use crate::core::host_bridge::{ViewFactory, ViewHandle, ViewRequest};
use crate::core::scheduler::{ScheduleContext, ScheduleHandle, Scheduler};
use crate::core::TickControl;

//=== StackConfig =========================================================

/// Configuration for a [`PresentationStack`].
///
/// # Default Values
///
/// - **max_entries**: unlimited
/// - **fault_channel_capacity**: 64
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Upper bound on live plus pending entries. `None` is unlimited.
    pub max_entries: Option<usize>,

    /// Capacity of the fault notification channel. Faults beyond it are
    /// dropped with a warning.
    pub fault_channel_capacity: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_entries: None,
            fault_channel_capacity: 64,
        }
    }
}

//=== PendingView =========================================================

/// A present request waiting on a suspended view factory.
pub(super) struct PendingView<K: ControllerKind> {
    pub(super) request: PresentRequest<K>,
    pub(super) view_request: ViewRequest<K>,
}

//=== PresentationStack ===================================================

/// Layered stack of presented controllers.
///
/// The stack is single-threaded and host-driven: it only progresses
/// inside its own methods, and suspended steps resume in [`update`].
///
/// [`update`]: PresentationStack::update
///
/// # Example
///
/// ```rust
/// use std::task::Poll;
/// use aetheric_presenter::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Menu }
/// impl ControllerKind for Screen {}
///
/// struct Menu;
/// impl Controller<Screen> for Menu {}
///
/// struct Views(u64);
/// impl ViewFactory<Screen> for Views {
///     fn create_view(&mut self, _: &ViewRequest<Screen>) -> Poll<Result<ViewHandle, ViewCreationError>> {
///         self.0 += 1;
///         Poll::Ready(Ok(ViewHandle::new(self.0)))
///     }
///     fn destroy_view(&mut self, _: ViewHandle) {}
/// }
///
/// let mut registry = ControllerRegistry::new();
/// registry.register(Screen::Menu, |_, _| Ok(Box::new(Menu)));
///
/// let mut stack = PresentationStack::new(registry, Views(0));
/// let handle = stack.present(Screen::Menu, Args::none(), PresentOptions::new()).unwrap();
/// assert_eq!(stack.active().map(|e| e.id), Some(handle.id()));
///
/// stack.dismiss(handle.id());
/// assert!(stack.is_empty());
/// ```
pub struct PresentationStack<K: ControllerKind> {
    pub(super) config: StackConfig,
    pub(super) registry: ControllerRegistry<K>,
    pub(super) views: Box<dyn ViewFactory<K>>,
    pub(crate) entries: HashMap<EntryId, PresentableEntry<K>>,
    pub(crate) order: Vec<EntryId>,
    pub(super) pending_views: Vec<PendingView<K>>,
    pub(crate) ids: IdAllocator,
    pub(crate) requests: RequestQueue<K>,
    pub(crate) scheduler: Scheduler<K>,
    pub(crate) active: Option<EntryId>,
    fault_sender: Sender<ControllerFault>,
    fault_receiver: Receiver<ControllerFault>,
}

impl<K: ControllerKind> PresentationStack<K> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty stack with default configuration.
    pub fn new<V>(registry: ControllerRegistry<K>, views: V) -> Self
    where
        V: ViewFactory<K> + 'static,
    {
        Self::with_config(registry, views, StackConfig::default())
    }

    /// Creates an empty stack.
    ///
    /// # Panics
    ///
    /// Panics if `config.fault_channel_capacity == 0`.
    pub fn with_config<V>(registry: ControllerRegistry<K>, views: V, config: StackConfig) -> Self
    where
        V: ViewFactory<K> + 'static,
    {
        assert!(
            config.fault_channel_capacity > 0,
            "Fault channel capacity must be positive"
        );

        let (fault_sender, fault_receiver) = bounded(config.fault_channel_capacity);
        debug!(
            target: "presenter::stack",
            "Creating presentation stack ({} kinds, {:?})",
            registry.len(), config
        );

        Self {
            config,
            registry,
            views: Box::new(views),
            entries: HashMap::new(),
            order: Vec::new(),
            pending_views: Vec::new(),
            ids: IdAllocator::new(),
            requests: RequestQueue::new(),
            scheduler: Scheduler::new(),
            active: None,
            fault_sender,
            fault_receiver,
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn registry(&self) -> &ControllerRegistry<K> {
        &self.registry
    }

    /// Registration is allowed at any time; it affects later presents.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry<K> {
        &mut self.registry
    }

    /// Receiver for every controller fault captured by this stack.
    ///
    /// All clones share one queue: each fault is delivered once.
    pub fn faults(&self) -> Receiver<ControllerFault> {
        self.fault_receiver.clone()
    }

    //--- Structural Operations --------------------------------------------

    /// Presents a controller of `kind`.
    ///
    /// Fails immediately if the request is invalid or the view factory
    /// fails synchronously; the stack is left untouched in that case.
    /// Otherwise the returned handle resolves once the entry settles.
    pub fn present(&mut self, kind: K, args: Args, options: PresentOptions) -> StackResult<PresentHandle> {
        let id = self.ids.allocate();
        let token = CancellationToken::new();
        let (handle, completion) = PresentHandle::new(id, token.clone());

        let result = self.begin_present(PresentRequest {
            id,
            kind,
            args,
            options,
            token,
            completion,
        });
        self.drive();

        result.map(|()| handle)
    }

    /// Dismisses an entry and all its descendants, children first.
    ///
    /// Unknown or disposed ids are a logged no-op; the signal resolves
    /// with [`StackError::InvalidTransition`].
    pub fn dismiss(&mut self, entry: EntryId) -> DismissSignal {
        let (signal, waiter) = DismissSignal::new(entry);
        self.request_dismiss(entry, waiter);
        self.drive();
        signal
    }

    /// Dismisses every entry above `target`, top to bottom.
    ///
    /// Returns how many entries were asked to dismiss.
    pub fn pop_to(&mut self, target: PopTarget) -> usize {
        let count = self.begin_pop_to(target);
        self.drive();
        count
    }

    /// Dismisses every entry, top to bottom, and abandons pending views.
    pub fn dismiss_all(&mut self) {
        self.begin_dismiss_all();
        self.drive();
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the stack by one host tick.
    ///
    /// 1. Re-polls suspended view creations
    /// 2. Resumes suspended present/dismiss hooks
    /// 3. Runs due scheduled callbacks
    /// 4. Ticks settled controllers
    /// 5. Applies queued requests and settles activation
    pub fn update(&mut self, delta: f32) {
        self.poll_pending_views();
        self.poll_suspended_hooks();
        self.drive();

        self.scheduler.tick(delta, &mut self.requests);
        self.tick_controllers(delta);
        self.drive();
    }

    //--- Scheduling -------------------------------------------------------

    /// Schedules a host-owned callback (not tied to any entry).
    pub fn schedule<F>(&mut self, interval: f32, callback: F) -> ScheduleHandle
    where
        F: FnMut(&mut ScheduleContext<'_, K>) -> TickControl + 'static,
    {
        self.scheduler.schedule(None, interval, Box::new(callback))
    }

    pub fn unschedule(&mut self, handle: ScheduleHandle) -> bool {
        self.scheduler.unschedule(handle)
    }

    pub fn scheduler(&self) -> &Scheduler<K> {
        &self.scheduler
    }

    //--- Query API --------------------------------------------------------

    /// Snapshots of all entries, top to bottom.
    pub fn entries(&self) -> impl Iterator<Item = EntryInfo<K>> + '_ {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.entries.get(id))
            .map(PresentableEntry::info)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of presents waiting on the view factory.
    pub fn pending_len(&self) -> usize {
        self.pending_views.len()
    }

    pub fn contains(&self, entry: EntryId) -> bool {
        self.entries.contains_key(&entry)
    }

    pub fn get(&self, entry: EntryId) -> Option<EntryInfo<K>> {
        self.entries.get(&entry).map(PresentableEntry::info)
    }

    pub fn state(&self, entry: EntryId) -> Option<EntryState> {
        self.entries.get(&entry).map(|e| e.state)
    }

    /// The entry currently receiving input, if any.
    pub fn active(&self) -> Option<EntryInfo<K>> {
        self.active.and_then(|id| self.get(id))
    }

    /// Topmost live entry of `kind`.
    pub fn find(&self, kind: K) -> Option<EntryInfo<K>> {
        self.entries()
            .find(|info| info.kind == kind && info.state.is_live())
    }

    //--- Present Pipeline -------------------------------------------------

    /// Validates a request and starts view creation.
    ///
    /// Failures resolve the request's completion and are returned.
    pub(super) fn begin_present(&mut self, mut request: PresentRequest<K>) -> StackResult<()> {
        let view_request = match self.prepare(&mut request) {
            Ok(view_request) => view_request,
            Err(err) => return fail(&request.completion, err),
        };

        match self.views.create_view(&view_request) {
            Poll::Ready(Ok(view)) => self.finish_present(request, view_request, view),
            Poll::Ready(Err(source)) => {
                warn!(
                    target: "presenter::stack",
                    "View creation failed for {} ({:?}): {}",
                    request.id, request.kind, source
                );
                let err = StackError::ViewCreation {
                    entry: request.id,
                    source,
                };
                fail(&request.completion, err)
            }
            Poll::Pending => {
                debug!(
                    target: "presenter::stack",
                    "View for {} ({:?}) is pending",
                    request.id, request.kind
                );
                self.pending_views.push(PendingView {
                    request,
                    view_request,
                });
                Ok(())
            }
        }
    }

    /// Resolves defaults into the request and builds the view request.
    fn prepare(&self, request: &mut PresentRequest<K>) -> StackResult<ViewRequest<K>> {
        if request.token.is_cancelled() {
            return Err(StackError::Cancelled(request.id));
        }

        let Some(defaults) = self.registry.defaults(request.kind) else {
            return Err(StackError::invalid(
                Some(request.id),
                format!("controller kind {:?} is not registered", request.kind),
            ));
        };

        if let Some(max) = self.config.max_entries {
            if self.entries.len() + self.pending_views.len() >= max {
                return Err(StackError::invalid(
                    Some(request.id),
                    format!("stack is full ({} entries)", max),
                ));
            }
        }

        let parent_view = match request.options.parent {
            Some(parent) => match self.entries.get(&parent) {
                Some(entry) if entry.state.is_live() => Some(entry.view),
                _ => {
                    return Err(StackError::invalid(
                        Some(request.id),
                        format!("parent {} is not live", parent),
                    ))
                }
            },
            None => None,
        };

        let layer = request.options.layer.unwrap_or(defaults.layer);
        request.options.layer = Some(layer);
        request.options.flags |= defaults.flags;

        Ok(ViewRequest {
            entry: request.id,
            kind: request.kind,
            layer,
            parent: request.options.parent,
            parent_view,
        })
    }

    /// Constructs the controller for a ready view and inserts the entry.
    pub(super) fn finish_present(
        &mut self,
        request: PresentRequest<K>,
        view_request: ViewRequest<K>,
        view: ViewHandle,
    ) -> StackResult<()> {
        let PresentRequest {
            id,
            kind,
            args,
            options,
            token,
            completion,
        } = request;

        // The parent may have gone away while the view was pending
        if let Some(parent) = options.parent {
            if !self.is_live(parent) {
                debug!(target: "presenter::stack", "Parent {} of {} is gone, abandoning", parent, id);
                self.views.destroy_view(view);
                return fail(&completion, StackError::Cancelled(id));
            }
        }

        let context = FactoryContext {
            id,
            kind,
            layer: view_request.layer,
            parent: options.parent,
            view,
        };

        let controller = match self.registry.construct(&context, args) {
            Some(Ok(controller)) => controller,
            Some(Err(error)) => {
                self.views.destroy_view(view);
                let fault = ControllerFault {
                    entry: id,
                    kind: format!("{:?}", kind),
                    hook: Hook::Construct,
                    error,
                };
                self.publish_fault(&fault);
                return fail(&completion, fault.into());
            }
            None => {
                self.views.destroy_view(view);
                let err = StackError::invalid(
                    Some(id),
                    format!("controller kind {:?} is not registered", kind),
                );
                return fail(&completion, err);
            }
        };

        let flags = options.flags;
        let layer = view_request.layer;
        self.entries.insert(
            id,
            PresentableEntry {
                id,
                kind,
                parent: options.parent,
                layer,
                flags,
                state: EntryState::Created,
                stage: Stage::Idle,
                view,
                token,
                controller,
                completion: Some(completion),
                dismiss_waiters: Vec::new(),
                fault: None,
            },
        );

        let position = self.insert_position(layer);
        self.order.insert(position, id);

        info!(
            target: "presenter::stack",
            "Inserted {} ({:?}) on layer {} at position {} {:?}",
            id, kind, layer, position, flags
        );

        self.apply_preemption(id);
        Ok(())
    }

    /// Re-polls suspended view creations.
    fn poll_pending_views(&mut self) {
        for pending in std::mem::take(&mut self.pending_views) {
            let PendingView {
                request,
                view_request,
            } = pending;

            let parent_gone = request.options.parent.is_some_and(|parent| !self.is_live(parent));
            if request.token.is_cancelled() || parent_gone {
                debug!(target: "presenter::stack", "Abandoning pending view for {}", request.id);
                self.views.cancel_view(&view_request);
                resolve(&request.completion, Err(StackError::Cancelled(request.id)));
                continue;
            }

            match self.views.create_view(&view_request) {
                Poll::Ready(Ok(view)) => {
                    // Failures are delivered through the completion
                    let _ = self.finish_present(request, view_request, view);
                }
                Poll::Ready(Err(source)) => {
                    warn!(
                        target: "presenter::stack",
                        "View creation failed for {} ({:?}): {}",
                        request.id, request.kind, source
                    );
                    let err = StackError::ViewCreation {
                        entry: request.id,
                        source,
                    };
                    resolve(&request.completion, Err(err));
                }
                Poll::Pending => self.pending_views.push(PendingView {
                    request,
                    view_request,
                }),
            }
        }
    }

    /// Drops pending views matching `predicate`, resolving them cancelled.
    fn abandon_pending_views(&mut self, predicate: impl Fn(&PendingView<K>) -> bool) {
        let (abandoned, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_views)
            .into_iter()
            .partition(|pending| predicate(pending));
        self.pending_views = kept;

        for pending in abandoned {
            debug!(target: "presenter::stack", "Abandoning pending view for {}", pending.request.id);
            pending.request.token.cancel();
            self.views.cancel_view(&pending.view_request);
            resolve(
                &pending.request.completion,
                Err(StackError::Cancelled(pending.request.id)),
            );
        }
    }

    //--- Dismiss Pipeline -------------------------------------------------

    pub(super) fn request_dismiss(&mut self, id: EntryId, waiter: Sender<super::DismissOutcome>) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.dismiss_waiters.push(waiter);
            self.begin_dismiss_tree(id);
            return;
        }

        if self.pending_views.iter().any(|pending| pending.request.id == id) {
            self.abandon_pending_views(|pending| pending.request.id == id);
            resolve(&waiter, Ok(()));
            return;
        }

        let err = StackError::invalid(Some(id), "entry is unknown or already disposed");
        warn!(target: "presenter::stack", "{}", err);
        resolve(&waiter, Err(err));
    }

    /// Starts dismissal of `id` and every descendant, children first.
    pub(super) fn begin_dismiss_tree(&mut self, id: EntryId) {
        let mut subtree = Vec::new();
        self.collect_subtree(id, &mut subtree);

        self.abandon_pending_views(|pending| {
            pending
                .request
                .options
                .parent
                .is_some_and(|parent| subtree.contains(&parent))
        });

        for target in subtree {
            self.begin_dismiss(target);
        }
    }

    /// Collects the subtree rooted at `id` in post-order.
    ///
    /// Children are visited top to bottom in stack order.
    fn collect_subtree(&self, id: EntryId, out: &mut Vec<EntryId>) {
        if !self.entries.contains_key(&id) || out.contains(&id) {
            return;
        }

        let children: Vec<EntryId> = self
            .order
            .iter()
            .rev()
            .copied()
            .filter(|child| self.entries.get(child).is_some_and(|e| e.parent == Some(id)))
            .collect();

        for child in children {
            self.collect_subtree(child, out);
        }
        out.push(id);
    }

    fn begin_pop_to(&mut self, target: PopTarget) -> usize {
        let victims: Vec<EntryId> = match target {
            PopTarget::Entry(id) => {
                let Some(position) = self.order.iter().position(|other| *other == id) else {
                    warn!(target: "presenter::stack", "Pop target {} is not in the stack", id);
                    return 0;
                };
                let keep = self.ancestors(id);
                self.order[position + 1..]
                    .iter()
                    .rev()
                    .copied()
                    .filter(|other| !keep.contains(other))
                    .collect()
            }
            PopTarget::Layer(layer) => self
                .order
                .iter()
                .rev()
                .copied()
                .filter(|other| self.entries.get(other).is_some_and(|e| e.layer > layer))
                .collect(),
        };

        debug!(target: "presenter::stack", "Popping to {:?}: {} entries", target, victims.len());

        let count = victims.len();
        for victim in victims {
            self.begin_dismiss_tree(victim);
        }
        count
    }

    fn begin_dismiss_all(&mut self) {
        debug!(target: "presenter::stack", "Dismissing all {} entries", self.order.len());

        self.abandon_pending_views(|_| true);
        let victims: Vec<EntryId> = self.order.iter().rev().copied().collect();
        for victim in victims {
            self.begin_dismiss_tree(victim);
        }
    }

    /// Dismisses entries preempted by a freshly inserted entry.
    ///
    /// DismissAll takes every non-ancestor, Exclusive every non-ancestor
    /// on the same layer, Singleton every non-ancestor of the same kind.
    /// Presents still waiting on their view are abandoned by the same rule.
    fn apply_preemption(&mut self, id: EntryId) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        let (kind, layer, flags) = (entry.kind, entry.layer, entry.flags);

        let dismiss_all = flags.contains(PresentFlags::DISMISS_ALL);
        let exclusive = flags.contains(PresentFlags::EXCLUSIVE);
        let singleton = flags.contains(PresentFlags::SINGLETON);
        if !(dismiss_all || exclusive || singleton) {
            return;
        }

        // Pending presents are never ancestors of an inserted entry
        self.abandon_pending_views(|pending| {
            dismiss_all
                || (exclusive && pending.view_request.layer == layer)
                || (singleton && pending.request.kind == kind)
        });

        let ancestors = self.ancestors(id);
        let victims: Vec<EntryId> = self
            .order
            .iter()
            .rev()
            .copied()
            .filter(|other| *other != id && !ancestors.contains(other))
            .filter(|other| {
                self.entries.get(other).is_some_and(|e| {
                    e.state.is_live()
                        && (dismiss_all
                            || (exclusive && e.layer == layer)
                            || (singleton && e.kind == kind))
                })
            })
            .collect();

        if !victims.is_empty() {
            debug!(
                target: "presenter::stack",
                "{} preempts {:?}",
                id, victims
            );
        }

        for victim in victims {
            self.begin_dismiss_tree(victim);
        }
    }

    //--- Request Processing -----------------------------------------------

    /// Applies queued requests in FIFO order. Returns true if any ran.
    pub(super) fn process_requests(&mut self) -> bool {
        let mut processed = false;

        while let Some(request) = self.requests.pop() {
            processed = true;
            match request {
                StackRequest::Present(request) => {
                    let id = request.id;
                    if let Err(err) = self.begin_present(request) {
                        debug!(target: "presenter::stack", "Queued present {} failed: {}", id, err);
                    }
                }
                StackRequest::Dismiss { entry, waiter } => self.request_dismiss(entry, waiter),
                StackRequest::PopTo(target) => {
                    self.begin_pop_to(target);
                }
                StackRequest::DismissAll => self.begin_dismiss_all(),
            }
        }

        processed
    }

    //--- Internal Helpers -------------------------------------------------

    pub(super) fn is_live(&self, id: EntryId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.state.is_live())
    }

    /// Ancestor chain of `id`, nearest first.
    pub(super) fn ancestors(&self, id: EntryId) -> Vec<EntryId> {
        let mut chain = Vec::new();
        let mut current = self.entries.get(&id).and_then(|e| e.parent);

        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.entries.get(&parent).and_then(|e| e.parent);
        }
        chain
    }

    /// Index after the last entry whose layer is <= `layer`.
    fn insert_position(&self, layer: i32) -> usize {
        self.order
            .iter()
            .position(|other| self.entries.get(other).is_some_and(|e| e.layer > layer))
            .unwrap_or(self.order.len())
    }

    pub(super) fn publish_fault(&self, fault: &ControllerFault) {
        error!(target: "presenter::stack", "{}", fault);

        if let Err(TrySendError::Full(dropped)) = self.fault_sender.try_send(fault.clone()) {
            warn!(
                target: "presenter::stack",
                "Fault channel full, dropping fault for {}",
                dropped.entry
            );
        }
    }
}

//--- Free Helpers --------------------------------------------------------

fn fail(completion: &Sender<PresentOutcome>, err: StackError) -> StackResult<()> {
    resolve(completion, Err(err.clone()));
    Err(err)
}

//=========================================================================
// Unit Tests
//=========================================================================
