use crate::constants::{self, SEMICOLON_SPACE};
use crate::core::source::Source;
use crate::error::CspError;
use crate::utils::{self, BufferWriter};
use bytes::BytesMut;
use indexmap::IndexMap;
use serde::Deserialize;
use smallvec::SmallVec;
use std::{borrow::Cow, fmt};

/// Directive identifier, held in snake_case (`script_src`).
///
/// Names written in kebab-case are accepted on construction and folded into
/// the canonical form; the kebab spelling only reappears in the header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct DirectiveName(Cow<'static, str>);

macro_rules! define_directive_names {
    ($($ident:ident => $name:expr),+ $(,)?) => {
        impl DirectiveName {
            $(pub const $ident: DirectiveName = DirectiveName(Cow::Borrowed($name));)+
        }
    };
}

define_directive_names! {
    DEFAULT_SRC => constants::DEFAULT_SRC,
    SCRIPT_SRC => constants::SCRIPT_SRC,
    STYLE_SRC => constants::STYLE_SRC,
    IMG_SRC => constants::IMG_SRC,
    CONNECT_SRC => constants::CONNECT_SRC,
    FONT_SRC => constants::FONT_SRC,
    OBJECT_SRC => constants::OBJECT_SRC,
    MEDIA_SRC => constants::MEDIA_SRC,
    FRAME_SRC => constants::FRAME_SRC,
    WORKER_SRC => constants::WORKER_SRC,
    MANIFEST_SRC => constants::MANIFEST_SRC,
    CHILD_SRC => constants::CHILD_SRC,
    FRAME_ANCESTORS => constants::FRAME_ANCESTORS,
    BASE_URI => constants::BASE_URI,
    FORM_ACTION => constants::FORM_ACTION,
    SANDBOX => constants::SANDBOX,
    SCRIPT_SRC_ELEM => constants::SCRIPT_SRC_ELEM,
    SCRIPT_SRC_ATTR => constants::SCRIPT_SRC_ATTR,
    STYLE_SRC_ELEM => constants::STYLE_SRC_ELEM,
    STYLE_SRC_ATTR => constants::STYLE_SRC_ATTR,
    PREFETCH_SRC => constants::PREFETCH_SRC,
    UPGRADE_INSECURE_REQUESTS => constants::UPGRADE_INSECURE_REQUESTS,
    BLOCK_ALL_MIXED_CONTENT => constants::BLOCK_ALL_MIXED_CONTENT,
    REQUIRE_TRUSTED_TYPES_FOR => constants::REQUIRE_TRUSTED_TYPES_FOR,
    TRUSTED_TYPES => constants::TRUSTED_TYPES,
    REPORT_URI => constants::REPORT_URI,
    REPORT_TO => constants::REPORT_TO,
}

impl DirectiveName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Result<Self, CspError> {
        let name = name.into();
        let folded = match utils::canonical_name(&name) {
            Cow::Borrowed(same) if same.len() == name.len() => None,
            other => Some(other.into_owned()),
        };
        let canonical = folded.map_or(name, Cow::Owned);

        let valid = !canonical.is_empty()
            && canonical
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if !valid {
            return Err(CspError::InvalidDirectiveName(canonical.into_owned()));
        }

        Ok(Self(canonical))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn wire_name(&self) -> Cow<'static, str> {
        utils::wire_name(&self.0)
    }

    /// Only `script-src` and `style-src` may receive a generated nonce.
    #[inline]
    pub fn is_nonce_target(&self) -> bool {
        *self == Self::SCRIPT_SRC || *self == Self::STYLE_SRC
    }

    /// Key under which the raw nonce for this directive is assigned, e.g. `script_src_nonce`.
    #[inline]
    pub fn nonce_assign_key(&self) -> String {
        format!("{}{}", self.0, constants::NONCE_ASSIGN_SUFFIX)
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_name())
    }
}

impl TryFrom<String> for DirectiveName {
    type Error = CspError;

    #[inline]
    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<&'static str> for DirectiveName {
    type Error = CspError;

    #[inline]
    fn try_from(name: &'static str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl std::str::FromStr for DirectiveName {
    type Err = CspError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Single(String),
    List(Vec<String>),
}

/// Value of a directive: one token, or an ordered list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "ValueRepr")]
pub enum DirectiveValue {
    Single(Cow<'static, str>),
    List(SmallVec<[Cow<'static, str>; 4]>),
}

impl From<ValueRepr> for DirectiveValue {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Single(token) => Self::Single(Cow::Owned(token)),
            ValueRepr::List(tokens) => Self::List(tokens.into_iter().map(Cow::Owned).collect()),
        }
    }
}

impl DirectiveValue {
    #[inline]
    pub fn list<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        Self::List(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        let slice: &[Cow<'static, str>] = match self {
            Self::Single(token) => std::slice::from_ref(token),
            Self::List(tokens) => tokens,
        };
        slice.iter().map(|t| &**t).filter(|t| !t.is_empty())
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }

    /// Puts `token` in front of the existing tokens, turning a single value into a list.
    pub fn prepend(&mut self, token: impl Into<Cow<'static, str>>) {
        let token = token.into();
        match self {
            Self::List(tokens) => tokens.insert(0, token),
            Self::Single(existing) => {
                let existing = std::mem::take(existing);
                let mut tokens = SmallVec::new();
                tokens.push(token);
                tokens.push(existing);
                *self = Self::List(tokens);
            }
        }
    }
}

impl From<&'static str> for DirectiveValue {
    #[inline]
    fn from(token: &'static str) -> Self {
        Self::Single(Cow::Borrowed(token))
    }
}

impl From<String> for DirectiveValue {
    #[inline]
    fn from(token: String) -> Self {
        Self::Single(Cow::Owned(token))
    }
}

impl From<Source> for DirectiveValue {
    #[inline]
    fn from(source: Source) -> Self {
        Self::List(SmallVec::from_iter([source.into_token()]))
    }
}

impl From<Vec<String>> for DirectiveValue {
    #[inline]
    fn from(tokens: Vec<String>) -> Self {
        Self::list(tokens)
    }
}

impl<const N: usize> From<[&'static str; N]> for DirectiveValue {
    #[inline]
    fn from(tokens: [&'static str; N]) -> Self {
        Self::list(tokens)
    }
}

impl<const N: usize> From<[Source; N]> for DirectiveValue {
    #[inline]
    fn from(sources: [Source; N]) -> Self {
        Self::list(sources)
    }
}

impl FromIterator<Source> for DirectiveValue {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        Self::list(iter)
    }
}

/// Directive name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DirectiveMap {
    directives: IndexMap<DirectiveName, DirectiveValue>,
}

impl DirectiveMap {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a directive.
    #[inline]
    pub fn insert(&mut self, name: DirectiveName, value: impl Into<DirectiveValue>) -> &mut Self {
        self.directives.insert(name, value.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &DirectiveName) -> Option<&DirectiveValue> {
        self.directives.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &DirectiveName) -> bool {
        self.directives.contains_key(name)
    }

    #[inline]
    pub fn remove(&mut self, name: &DirectiveName) -> Option<DirectiveValue> {
        self.directives.shift_remove(name)
    }

    /// Prepends `token` to the directive's tokens, creating the directive if absent.
    pub fn prepend_token(&mut self, name: &DirectiveName, token: impl Into<Cow<'static, str>>) {
        let token = token.into();
        match self.directives.get_mut(name) {
            Some(value) => value.prepend(token),
            None => {
                self.directives
                    .insert(name.clone(), DirectiveValue::List(SmallVec::from_iter([token])));
            }
        }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&DirectiveName, &DirectiveValue)> {
        self.directives.iter()
    }

    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &DirectiveName> {
        self.directives.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub(crate) fn estimated_size(&self) -> usize {
        self.directives
            .iter()
            .map(|(name, value)| {
                name.as_str().len() + value.tokens().map(|t| t.len() + 1).sum::<usize>() + 2
            })
            .sum()
    }

    /// Serialized header value, e.g. `default-src 'none'; script-src 'self';`.
    pub fn to_header_string(&self) -> String {
        let mut buffer = BytesMut::with_capacity(self.estimated_size());
        self.write_to_buffer(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl BufferWriter for DirectiveMap {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        if self.directives.is_empty() {
            return;
        }

        let mut first = true;
        for (name, value) in &self.directives {
            if !first {
                buffer.extend_from_slice(SEMICOLON_SPACE);
            }
            buffer.extend_from_slice(name.wire_name().as_bytes());
            for token in value.tokens() {
                buffer.extend_from_slice(b" ");
                buffer.extend_from_slice(token.as_bytes());
            }
            first = false;
        }
        buffer.extend_from_slice(b";");
    }
}

impl FromIterator<(DirectiveName, DirectiveValue)> for DirectiveMap {
    fn from_iter<I: IntoIterator<Item = (DirectiveName, DirectiveValue)>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DirectiveMap {
    type Item = (&'a DirectiveName, &'a DirectiveValue);
    type IntoIter = indexmap::map::Iter<'a, DirectiveName, DirectiveValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}
