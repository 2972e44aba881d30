/// A name that matches a `LIST` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name {
    pub(crate) attributes: Vec<NameAttribute>,
    pub(crate) delimiter: Option<String>,
    pub(crate) name: String,
}

/// An attribute set for an IMAP name.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum NameAttribute {
    /// It is not possible for any child levels of hierarchy to exist
    /// under this name; no child levels exist now and none can be
    /// created in the future.
    NoInferiors,

    /// It is not possible to use this name as a selectable mailbox.
    NoSelect,

    /// The mailbox has been marked "interesting" by the server; the
    /// mailbox probably contains messages that have been added since
    /// the last time the mailbox was selected.
    Marked,

    /// The mailbox does not contain any additional messages since the
    /// last time the mailbox was selected.
    Unmarked,

    /// Any other attribute, such as the special-use ones from RFC 6154.
    Other(String),
}

impl<'a> From<imap_proto::NameAttribute<'a>> for NameAttribute {
    fn from(attr: imap_proto::NameAttribute<'a>) -> Self {
        use imap_proto::NameAttribute as Proto;
        match attr {
            Proto::NoInferiors => NameAttribute::NoInferiors,
            Proto::NoSelect => NameAttribute::NoSelect,
            Proto::Marked => NameAttribute::Marked,
            Proto::Unmarked => NameAttribute::Unmarked,
            Proto::Extension(s) => NameAttribute::Other(s.into_owned()),
            other => NameAttribute::Other(format!("{:?}", other)),
        }
    }
}

impl Name {
    /// Attributes of this name.
    pub fn attributes(&self) -> &[NameAttribute] {
        &self.attributes[..]
    }

    /// The hierarchy delimiter is a character used to delimit levels of hierarchy in a mailbox
    /// name.  `None` means that no hierarchy exists; the name is a "flat" name.
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }

    /// The mailbox name. Unless [`NameAttribute::NoSelect`] is indicated, the name is valid as an
    /// argument for commands, such as `SELECT`, that accept mailbox names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the server allows this name to be selected.
    pub fn is_selectable(&self) -> bool {
        !self.attributes.contains(&NameAttribute::NoSelect)
    }
}
