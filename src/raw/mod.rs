mod arena;
mod handle;
mod node;
mod raw_tree;
mod stamp;

pub(crate) use handle::Handle;
pub(crate) use raw_tree::RawTree;
pub(crate) use stamp::Stamp;
