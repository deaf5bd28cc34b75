use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

static CL100K: LazyLock<Option<CoreBPE>> = LazyLock::new(|| tiktoken_rs::cl100k_base().ok());

/// cl100k_base token count. Falls back to a four-chars-per-token estimate if the
/// encoder cannot be built.
pub fn count_tokens(text: &str) -> usize {
    match CL100K.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => text.chars().count().div_ceil(4),
    }
}
