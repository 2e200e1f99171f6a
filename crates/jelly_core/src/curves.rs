//! Radius profiles for the bell and the sub-umbrella.
//!
//! Both curves take the normalized ring parameter `t` in `[0, 1]`, where
//! `t = 0` is the first ring of the section.

use crate::traits::Scalar;

/// Bell profile: wide at the rim (`t = 0`) and narrowing toward the apex.
/// The logarithmic term keeps the radius from collapsing too early.
///
/// `sin(pi - 0.99 pi t) + ln(100 t + 2) / 3`
pub fn bell_radius<T: Scalar>(t: T) -> T {
    let pi = T::PI();
    let narrowing = T::from_f64(0.99).unwrap();
    let log_scale = T::from_f64(100.0).unwrap();
    let log_bias = T::from_f64(2.0).unwrap();
    let three = T::from_f64(3.0).unwrap();

    (pi - narrowing * pi * t).sin() + (log_scale * t + log_bias).ln() / three
}

/// Tail shape coefficient: exactly 1 at `t = 0` so the first tail ring matches
/// the last bell ring, decaying to about 0.07 at `t = 1`.
///
/// `sin(0.25 pi t + 0.5 pi) * (1 - 0.9 t)`
pub fn tail_radius<T: Scalar>(t: T) -> T {
    let pi = T::PI();
    let quarter = T::from_f64(0.25).unwrap();
    let half = T::from_f64(0.5).unwrap();
    let taper = T::from_f64(0.9).unwrap();

    (quarter * pi * t + half * pi).sin() * (T::one() - taper * t)
}
