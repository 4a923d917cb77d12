/// A parent link: `from` is the descendant, `to` the ancestor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: String, to: String) -> Self {
        Self { from, to }
    }
}
