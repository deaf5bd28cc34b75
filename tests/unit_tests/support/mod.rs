mod pages;

pub use mock_server::{MockServer, start_mock_server};
pub use mocks::{HashEmbedder, MockLlmClient, MockOcrEngine, MockPdfEngine};
pub use pages::{TABLE_ROWS, scanned_page, table_page, text_page};
