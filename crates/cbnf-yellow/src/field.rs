/// Named references from a `SYNTAX_RULE` node to one of its children.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldName {
    Name,
    Definition,
}

impl FieldName {
    pub const ALL: [Self; 2] = [Self::Name, Self::Definition];
    pub(crate) const COUNT: usize = Self::ALL.len();

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Definition => "definition",
        }
    }

    /// Looks a field up by the name consumers use for it.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
