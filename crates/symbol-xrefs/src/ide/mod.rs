pub mod lsp;
pub mod navigation;
