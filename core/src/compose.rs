//! Right-to-left function composition
//!
//! `compose(vec![f, g, h])(x) == f(g(h(x)))`. The store uses it to fold
//! middleware wrappers and enhancers; it is pure and stateless.

/// A boxed `T → T` function, the unit [`compose`] works with
pub type Composable<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Compose `T → T` functions from right to left.
///
/// With no functions the result is the identity; with one it is that
/// function.
///
/// ```
/// use rudux_core::compose::{compose, Composable};
///
/// let add_one: Composable<i32> = Box::new(|x| x + 1);
/// let double: Composable<i32> = Box::new(|x| x * 2);
///
/// // add_one(double(5))
/// assert_eq!(compose(vec![add_one, double])(5), 11);
/// assert_eq!(compose::<i32>(vec![])(5), 5);
/// ```
#[must_use]
pub fn compose<T: 'static>(mut fns: Vec<Composable<T>>) -> Composable<T> {
    match fns.len() {
        0 => Box::new(|value| value),
        1 => fns.remove(0),
        _ => Box::new(move |value| fns.iter().rev().fold(value, |acc, f| f(acc))),
    }
}

/// Compose functions of differing types from right to left.
///
/// `compose!(f, g, h)` is `move |x| f(g(h(x)))`; `compose!()` is the identity.
///
/// ```
/// use rudux_core::compose;
///
/// let parse = |s: &str| s.len();
/// let describe = |n: usize| format!("{n} chars");
///
/// let f = compose!(describe, parse);
/// assert_eq!(f("hello"), "5 chars");
/// assert_eq!(compose!()(7), 7);
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        |value| value
    };
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {{
        let outer = $f;
        let inner = $crate::compose!($($rest),+);
        move |value| outer(inner(value))
    }};
}
