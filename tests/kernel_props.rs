use memprobe::buffer::Matrix;
use memprobe::kernels::{multiply, sum_random, sum_sequential, sum_strided};
use memprobe::prng::generate;
use proptest::prelude::*;

fn square(n: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    proptest::collection::vec(proptest::collection::vec(-100.0f64..100.0, n), n)
}

proptest! {
    #[test]
    fn stride_one_matches_sequential(data in proptest::collection::vec(-1.0e6f64..1.0e6, 0..1024)) {
        prop_assert_eq!(sum_strided(&data, 1).unwrap(), sum_sequential(&data));
    }

    #[test]
    fn generate_twice_is_identical(seed in any::<u32>(), count in 0usize..2048) {
        prop_assert_eq!(generate(count, seed), generate(count, seed));
    }

    #[test]
    fn random_scan_is_reproducible(
        seed in any::<u32>(),
        len in 1usize..4096,
        iterations in 0usize..2048,
    ) {
        let data = generate(len, seed ^ 0x5a5a);
        prop_assert_eq!(
            sum_random(&data, seed, iterations),
            sum_random(&data, seed, iterations)
        );
    }

    #[test]
    fn strided_never_panics(len in 0usize..512, stride in 1usize..1024) {
        let data = vec![1.0; len];
        let expected = if len == 0 { 0 } else { (len - 1) / stride + 1 };
        prop_assert_eq!(sum_strided(&data, stride).unwrap(), expected as f64);
    }

    #[test]
    fn one_by_one_multiply(a in -1.0e3f64..1.0e3, b in -1.0e3f64..1.0e3) {
        let ma = Matrix::from_rows(&[vec![a]]).unwrap();
        let mb = Matrix::from_rows(&[vec![b]]).unwrap();
        prop_assert_eq!(multiply(&ma, &mb).unwrap().to_rows(), vec![vec![a * b]]);
    }

    #[test]
    fn identity_is_neutral(rows in square(2)) {
        let a = Matrix::from_rows(&rows).unwrap();
        let i = Matrix::identity(2).unwrap();
        prop_assert!(multiply(&a, &i).unwrap().approx_eq(&a, 1e-12));
        prop_assert!(multiply(&i, &a).unwrap().approx_eq(&a, 1e-12));
    }

    #[test]
    fn mismatched_dimensions_never_produce_a_result(n in 1usize..6, m in 1usize..6) {
        prop_assume!(n != m);
        let a = Matrix::zeroed(n).unwrap();
        let b = Matrix::zeroed(m).unwrap();
        prop_assert!(multiply(&a, &b).is_err());
    }
}

#[test]
fn multiply_matches_textbook_three_by_three() {
    let a = Matrix::from_rows(&[
        vec![1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0],
        vec![7.0, 8.0, 9.0],
    ])
    .unwrap();
    let b = Matrix::from_rows(&[
        vec![9.0, 8.0, 7.0],
        vec![6.0, 5.0, 4.0],
        vec![3.0, 2.0, 1.0],
    ])
    .unwrap();
    let c = multiply(&a, &b).unwrap();
    assert_eq!(
        c.to_rows(),
        vec![
            vec![30.0, 24.0, 18.0],
            vec![84.0, 69.0, 54.0],
            vec![138.0, 114.0, 90.0],
        ]
    );
}
