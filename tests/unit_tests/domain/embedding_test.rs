use docextract::domain::Embedding;

#[test]
fn given_identical_vectors_when_computing_cosine_then_one() {
    let a = Embedding::new(vec![1.0, 2.0, 3.0]);

    assert!((a.cosine_similarity(&a.clone()) - 1.0).abs() < 1e-6);
}

#[test]
fn given_mismatched_or_zero_vectors_when_computing_cosine_then_zero() {
    let a = Embedding::new(vec![1.0, 0.0]);

    assert_eq!(a.cosine_similarity(&Embedding::new(vec![1.0, 0.0, 0.0])), 0.0);
    assert_eq!(a.cosine_similarity(&Embedding::new(vec![0.0, 0.0])), 0.0);
}

#[test]
fn given_vector_when_normalizing_then_unit_length() {
    let normalized = Embedding::new(vec![3.0, 4.0]).normalized();

    assert!((normalized.magnitude() - 1.0).abs() < 1e-6);
    assert_eq!(normalized.values, vec![0.6, 0.8]);
}

#[test]
fn given_zero_vector_when_normalizing_then_unchanged() {
    let zero = Embedding::new(vec![0.0, 0.0, 0.0]);

    assert_eq!(zero.normalized(), zero);
}
