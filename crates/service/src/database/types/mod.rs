mod dcontent_id;

pub use dcontent_id::DContentId;
