mod page;

pub use page::EditorPage;
