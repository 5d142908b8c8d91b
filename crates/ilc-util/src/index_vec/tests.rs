use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TestId(u32);

impl Idx for TestId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize);
        TestId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[test]
fn new_vec_is_empty() {
    let vec: IndexVec<TestId, i32> = IndexVec::new();
    assert!(vec.is_empty());
    assert_eq!(vec.len(), 0);
}

#[test]
fn push_returns_typed_index_in_order() {
    let mut vec: IndexVec<TestId, i32> = IndexVec::new();
    let idx1 = vec.push(10);
    let idx2 = vec.push(20);
    let idx3 = vec.push(30);

    assert_eq!(vec[idx1], 10);
    assert_eq!(vec[idx2], 20);
    assert_eq!(vec[idx3], 30);
    assert_eq!(vec.len(), 3);
}

#[test]
fn get_returns_none_out_of_bounds() {
    let mut vec: IndexVec<TestId, i32> = IndexVec::new();
    vec.push(10);
    assert_eq!(vec.get(TestId(0)), Some(&10));
    assert_eq!(vec.get(TestId(1)), None);
}

#[test]
fn iter_enumerated_pairs_indices_with_values() {
    let mut vec: IndexVec<TestId, &str> = IndexVec::new();
    vec.push("a");
    vec.push("b");

    let collected: Vec<_> = vec.iter_enumerated().collect();
    assert_eq!(collected, vec![(TestId(0), &"a"), (TestId(1), &"b")]);
}

#[test]
fn default_is_empty() {
    let vec: IndexVec<TestId, i32> = IndexVec::default();
    assert!(vec.is_empty());
}
