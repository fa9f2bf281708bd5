#![forbid(unsafe_code)]

use fixed_array::{fixed_arrays, FixedArray};

#[fixed_arrays]
mod safe {
    use fixed_array::FixedArray;

    pub struct Empty
    where
        Self: FixedArray<u32>;

    #[fixed_array_size(2)]
    pub struct Pair
    where
        Self: FixedArray<u32>;
}

fn main() {
    let mut pair = safe::Pair::new();
    pair[1] = 7;
    assert_eq!(pair[1], 7);
    assert_eq!(pair.as_slice(), &[0, 7]);
    assert!(safe::Empty::new().get(0).is_err());
}
