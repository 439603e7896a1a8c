//! Ready-made orders for keys and weights.
//!
//! Every type here implements [`Comparator`]. Absent values are modelled as
//! `Option<T>` and sort as negative infinity, so an absent weight always
//! rises to the root of a min-heap treap.

use std::cmp::Ordering;

use crate::traits::Comparator;

/// The type's own [`Ord`].
///
/// Covers every integer width, `String`/`&str`, `Vec<u8>`, `SystemTime`,
/// `Duration` and tuples of those. `Option<T>` already orders `None` first,
/// which is the absent-is-minimal convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// IEEE 754 total order for `f32` and `f64`.
///
/// `-0.0` sorts before `+0.0` and NaN sorts after `+inf`, which keeps the
/// order total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Float;

impl Comparator<f32> for Float {
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<f64> for Float {
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}

/// Byte-wise lexicographic order over anything viewable as bytes.
///
/// The first differing byte decides; otherwise the shorter input sorts first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bytes;

impl<T: AsRef<[u8]> + ?Sized> Comparator<T> for Bytes {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.as_ref().cmp(b.as_ref())
    }
}

/// Inverted order. See [`max_heap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).reverse()
    }
}

/// Turn a weight order into its max-heap counterpart: `pop` then yields the
/// entry with the largest weight first.
///
/// Inversion also moves absent values to positive infinity.
pub fn max_heap<C>(cmp: C) -> Reverse<C> {
    Reverse(cmp)
}

/// Lift `C` to `Option<T>`: `None == None`, `None < Some(_)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nullable<C>(pub C);

impl<T, C: Comparator<T>> Comparator<Option<T>> for Nullable<C> {
    fn compare(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.0.compare(a, b),
        }
    }
}

/// Compare a projection of the value.
///
/// ```
/// use treap::{ByKey, Comparator, Natural};
///
/// struct Job { deadline: u64 }
///
/// let by_deadline = ByKey::new(|j: &Job| j.deadline, Natural);
/// assert!(by_deadline.compare(&Job { deadline: 1 }, &Job { deadline: 2 }).is_lt());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F, C> {
    project: F,
    cmp: C,
}

impl<F, C> ByKey<F, C> {
    pub fn new(project: F, cmp: C) -> Self {
        Self { project, cmp }
    }
}

impl<T, P, F, C> Comparator<T> for ByKey<F, C>
where
    F: Fn(&T) -> P,
    C: Comparator<P>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.cmp.compare(&(self.project)(a), &(self.project)(b))
    }
}

/// Lexicographic chaining: `B` only decides when `A` reports equality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Then<A, B>(pub A, pub B);

impl<T: ?Sized, A, B> Comparator<T> for Then<A, B>
where
    A: Comparator<T>,
    B: Comparator<T>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).then_with(|| self.1.compare(a, b))
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::{Equal, Greater, Less};
    use std::time::{Duration, SystemTime};

    use super::*;

    #[test]
    fn natural_orders_scalars() {
        assert_eq!(Natural.compare(&1_i8, &2), Less);
        assert_eq!(Natural.compare(&-3_i64, &-3), Equal);
        assert_eq!(Natural.compare(&u64::MAX, &0), Greater);
        assert_eq!(Natural.compare(&u16::MIN, &u16::MAX), Less);
        assert_eq!(Natural.compare("abc", "abd"), Less);
        assert_eq!(Natural.compare(&String::from("b"), &String::from("a")), Greater);

        let t0 = SystemTime::UNIX_EPOCH;
        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(Natural.compare(&t0, &t1), Less);
        assert_eq!(Natural.compare(&t1, &t0), Greater);
        assert_eq!(Natural.compare(&t1, &t1), Equal);
    }

    #[test]
    fn absent_sorts_first() {
        assert_eq!(Natural.compare(&None, &Some(1)), Less);
        assert_eq!(Natural.compare(&Some(1), &None), Greater);
        assert_eq!(Natural.compare(&None::<i32>, &None), Equal);

        let floats = Nullable(Float);
        assert_eq!(floats.compare(&None, &Some(f64::NEG_INFINITY)), Less);
        assert_eq!(floats.compare(&Some(0.5), &None), Greater);
        assert_eq!(floats.compare(&None::<f64>, &None), Equal);
        assert_eq!(floats.compare(&Some(0.5), &Some(0.25)), Greater);
    }

    #[test]
    fn max_heap_inverts_including_absent() {
        let cmp = max_heap(Natural);
        assert_eq!(cmp.compare(&None, &Some(1)), Greater);
        assert_eq!(cmp.compare(&Some(1), &None), Less);
        assert_eq!(cmp.compare(&Some(1), &Some(2)), Greater);
        assert_eq!(cmp.compare(&Some(2), &Some(1)), Less);
        assert_eq!(cmp.compare(&Some(0), &Some(0)), Equal);
        assert_eq!(Reverse(Natural).compare(&1, &2), Greater);
    }

    #[test]
    fn float_total_order() {
        assert_eq!(Float.compare(&1.0_f32, &2.0), Less);
        assert_eq!(Float.compare(&2.5_f64, &2.5), Equal);
        assert_eq!(Float.compare(&-0.0_f64, &0.0), Less);
        assert_eq!(Float.compare(&f64::NAN, &f64::INFINITY), Greater);
        assert_eq!(Float.compare(&f64::NEG_INFINITY, &f64::MIN), Less);
    }

    #[test]
    fn bytes_prefix_sorts_first() {
        assert_eq!(Bytes.compare(&b"ab"[..], &b"abc"[..]), Less);
        assert_eq!(Bytes.compare(&b"b"[..], &b"abc"[..]), Greater);
        assert_eq!(Bytes.compare(&vec![0xFF_u8], &vec![0x00, 0x01]), Greater);
        assert_eq!(Bytes.compare("", ""), Equal);
        assert_eq!(Bytes.compare("Zebra", "apple"), Less);
    }

    #[test]
    fn composite_orders() {
        let by_len = Then(ByKey::new(|s: &&str| s.len(), Natural), Natural);
        assert_eq!(by_len.compare(&"zz", &"aaa"), Less);
        assert_eq!(by_len.compare(&"ab", &"aa"), Greater);
        assert_eq!(by_len.compare(&"ab", &"ab"), Equal);

        let pair = Then(
            ByKey::new(|p: &(u8, i32)| p.0, Natural),
            ByKey::new(|p: &(u8, i32)| p.1, Reverse(Natural)),
        );
        assert_eq!(pair.compare(&(1, 5), &(1, 9)), Greater);
        assert_eq!(pair.compare(&(0, 5), &(1, 9)), Less);
    }

    #[test]
    fn closures_are_comparators() {
        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        assert_eq!(by_abs.compare(&-3, &2), Greater);
        assert_eq!(Reverse(by_abs).compare(&-3, &2), Less);
    }
}
