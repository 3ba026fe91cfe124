//! Access-pattern kernels: the hot loops being measured.

// IMPORTANT: Do not call assert_invariant or any PPT logging in kernel loops to avoid locks/allocs.

use crate::buffer::Matrix;
use crate::error::{Precondition, Result};
use crate::prng::Lcg;

/// Sum every element in ascending index order.
///
/// The spatial-locality baseline. Summation order is fixed so results are
/// reproducible bit for bit.
#[inline(never)]
pub fn sum_sequential(data: &[f64]) -> f64 {
    let mut sum = 0.0;
    for &v in data {
        sum += v;
    }
    sum
}

/// Sum elements at `0, stride, 2 * stride, …` below `data.len()`.
///
/// `stride == 1` visits exactly what [`sum_sequential`] visits.
#[inline(never)]
pub fn sum_strided(data: &[f64], stride: usize) -> Result<f64> {
    if stride == 0 {
        return Err(Precondition::ZeroStride.into());
    }
    let mut sum = 0.0;
    for &v in data.iter().step_by(stride) {
        sum += v;
    }
    Ok(sum)
}

/// Sum `iterations` elements picked by an LCG seeded with `seed`.
pub fn sum_random(data: &[f64], seed: u32, iterations: usize) -> f64 {
    let mut lcg = Lcg::new(seed);
    sum_random_with(data, &mut lcg, iterations)
}

/// Sum `iterations` elements at indices drawn from `lcg`.
///
/// Each draw is reduced modulo the current length. An empty slice sums to
/// zero and leaves the generator untouched.
#[inline(never)]
pub fn sum_random_with(data: &[f64], lcg: &mut Lcg, iterations: usize) -> f64 {
    let len = data.len();
    if len == 0 {
        return 0.0;
    }
    let mut sum = 0.0;
    for _ in 0..iterations {
        sum += data[lcg.next_index(len)];
    }
    sum
}

/// `a × b` with the naive ijk loop order.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_dims(a, b, a.dim())?;
    let mut c = Matrix::zeroed(a.dim())?;
    multiply_into(a, b, &mut c)?;
    Ok(c)
}

/// Write `a × b` into `c` with the naive ijk loop order.
///
/// The innermost loop walks down a column of `b`, striding a full row per
/// step. That cache-hostile order is the point of the benchmark: do not
/// reorder or tile it.
#[inline(never)]
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    check_dims(a, b, c.dim())?;
    let n = a.dim();
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] = 0.0;
            for k in 0..n {
                c[i * n + j] += a[i * n + k] * b[k * n + j];
            }
        }
    }
    Ok(())
}

fn check_dims(a: &Matrix, b: &Matrix, out: usize) -> Result<()> {
    if a.dim() != b.dim() || a.dim() != out {
        return Err(Precondition::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
            out,
        }
        .into());
    }
    Ok(())
}

/// Alternate add/subtract over `0..iterations`: odd `i` adds, even `i` subtracts.
///
/// One data-dependent branch per iteration with pure integer work.
#[inline(never)]
pub fn branch_mix(iterations: u64) -> i64 {
    let mut sum: i64 = 0;
    for i in 0..iterations {
        let v = std::hint::black_box(i as i64);
        if v & 1 == 1 {
            sum = sum.wrapping_add(v);
        } else {
            sum = sum.wrapping_sub(v);
        }
    }
    sum
}
