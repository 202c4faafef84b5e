//=========================================================================
// Arguments
//=========================================================================
//
// Type-erased payload carried by present requests and routed commands.
//
// The stack never interprets arguments; controllers downcast them to the
// concrete type they expect.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

//=== Args ================================================================

/// Optional type-erased argument value.
///
/// # Example
///
/// ```
/// use aetheric_presenter::prelude::*;
///
/// let mut args = Args::new(42u32);
/// assert_eq!(args.get::<u32>(), Some(&42));
/// assert_eq!(args.get::<String>(), None);
/// assert_eq!(args.take::<u32>(), Some(42));
/// assert!(args.is_none());
/// ```
#[derive(Default)]
pub struct Args(Option<Box<dyn Any + Send>>);

impl Args {
    /// No arguments.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps a value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Returns true if a value of type `T` is stored.
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_deref().is_some_and(|value| value.is::<T>())
    }

    /// Borrows the value if it has type `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref::<T>()
    }

    /// Mutably borrows the value if it has type `T`.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()?.downcast_mut::<T>()
    }

    /// Moves the value out if it has type `T`, leaving `Args::none()`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self) -> Option<T> {
        let boxed = self.0.take()?;
        match boxed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(boxed) => {
                self.0 = Some(boxed);
                None
            }
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Args(..)"),
            None => f.write_str("Args(None)"),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Profile {
        name: String,
    }

    #[test]
    fn none_holds_nothing() {
        let args = Args::none();
        assert!(args.is_none());
        assert!(!args.is::<u32>());
        assert_eq!(args.get::<u32>(), None);
    }

    #[test]
    fn get_matches_only_stored_type() {
        let args = Args::new(Profile {
            name: "ada".to_string(),
        });
        assert!(args.is::<Profile>());
        assert_eq!(args.get::<Profile>().map(|p| p.name.as_str()), Some("ada"));
        assert!(args.get::<String>().is_none());
    }

    #[test]
    fn take_with_wrong_type_keeps_value() {
        let mut args = Args::new(5i64);
        assert_eq!(args.take::<i32>(), None);
        assert!(args.is::<i64>());
        assert_eq!(args.take::<i64>(), Some(5));
        assert!(args.is_none());
    }

    #[test]
    fn get_mut_allows_in_place_update() {
        let mut args = Args::new(vec![1, 2]);
        if let Some(values) = args.get_mut::<Vec<i32>>() {
            values.push(3);
        }
        assert_eq!(args.get::<Vec<i32>>(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn debug_hides_payload() {
        assert_eq!(format!("{:?}", Args::new(1u8)), "Args(..)");
        assert_eq!(format!("{:?}", Args::none()), "Args(None)");
    }
}
