/// Highest supported polynomial/Bezier degree.
///
/// Factorials above 12! overflow 32-bit arithmetic and the Bernstein to
/// power-basis conversion loses precision well before 64-bit overflow,
/// so the closed-form coefficient formulas are capped here.
pub const MAX_DEGREE: usize = 12;

const FACTORIALS: [u64; MAX_DEGREE + 1] = [
    1,
    1,
    2,
    6,
    24,
    120,
    720,
    5_040,
    40_320,
    362_880,
    3_628_800,
    39_916_800,
    479_001_600,
];

/// Returns `n!` for `n <= MAX_DEGREE`.
///
/// # Panics
///
/// Panics if `n` exceeds [`MAX_DEGREE`]; callers validate the degree cap
/// at construction time.
#[must_use]
pub fn factorial(n: usize) -> u64 {
    assert!(n <= MAX_DEGREE, "factorial beyond the supported degree cap");
    FACTORIALS[n]
}

/// Returns the binomial coefficient `C(n, k)` for `n <= MAX_DEGREE`.
///
/// # Panics
///
/// Panics if `n` exceeds [`MAX_DEGREE`] or `k > n`.
#[must_use]
pub fn binomial(n: usize, k: usize) -> u64 {
    assert!(k <= n, "binomial coefficient requires k <= n");
    factorial(n) / (factorial(k) * factorial(n - k))
}

/// The falling factorial `n * (n-1) * ... * (n-k+1)`, the weight a
/// power-basis term picks up under k-fold differentiation.
#[must_use]
pub fn falling_factorial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    factorial(n) / factorial(n - k)
}
