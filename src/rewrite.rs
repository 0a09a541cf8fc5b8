//! Auto-translation of rendered UI trees.
/// UI tree model
mod node;
/// Recursive rewriting
mod rewriter;
/// Skip heuristic
mod skip;

pub use node::{
    Element,
    Node,
};
pub use rewriter::{
    Rewriter,
    TRANSLATABLE_ATTRIBUTES,
    is_translatable_attribute,
};
pub use skip::{
    SkipPolicy,
    should_skip,
};
