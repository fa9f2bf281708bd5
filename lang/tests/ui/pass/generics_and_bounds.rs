use fixed_array::{fixed_arrays, Enumerator, FixedArray};
use std::fmt::Debug;

#[fixed_arrays]
mod shapes {
    use fixed_array::FixedArray;

    /// Three slots of anything debuggable.
    #[derive(Debug, Clone)]
    #[fixed_array_size(3)]
    pub struct Triple<T>
    where
        T: std::fmt::Debug,
        Self: FixedArray<T>;

    #[fixed_array_size(2)]
    #[repr(C, align(16))]
    pub(crate) struct Aligned
    where
        Self: FixedArray<[u8; 3]>;

    pub struct Never<const N: usize>
    where
        Self: FixedArray<[u8; N]>;

    mod private {
        use super::FixedArray;

        #[fixed_array_size(1)]
        struct Hidden
        where
            Self: FixedArray<Option<Box<str>>>;

        #[allow(dead_code)]
        pub fn first() -> Option<Box<str>> {
            let mut hidden = Hidden::new();
            hidden[0] = Some("first".into());
            let [first] = hidden.into_array();
            first
        }
    }
}

fn describe<T: Debug, A: FixedArray<T>>(array: &A) -> String {
    let mut cursor = array.enumerator();
    let mut parts = Vec::new();
    while cursor.advance() {
        parts.push(format!("{:?}", cursor.current()));
    }
    parts.join(",")
}

fn main() {
    let mut triple = shapes::Triple::<&str>::new();
    triple[0] = "a";
    let cloned = triple.clone();
    assert_eq!(describe(&cloned), "Some(\"a\"),Some(\"\"),Some(\"\")");

    let aligned = shapes::Aligned::from_array([[1, 2, 3], [4, 5, 6]]);
    assert_eq!(std::mem::align_of::<shapes::Aligned>(), 16);
    assert_eq!(aligned.iter().flatten().sum::<u8>(), 21);

    let never = shapes::Never::<4>::new();
    assert!(never.is_empty());
    assert_eq!(never.iter().len(), 0);
}
