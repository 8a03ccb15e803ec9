use crate::constants;
use bytes::BytesMut;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::OnceLock;

pub(crate) trait BufferWriter {
    fn write_to_buffer(&self, buffer: &mut BytesMut);
}

static WIRE_NAMES: &[(&str, &str)] = &[
    (constants::DEFAULT_SRC, "default-src"),
    (constants::SCRIPT_SRC, "script-src"),
    (constants::STYLE_SRC, "style-src"),
    (constants::IMG_SRC, "img-src"),
    (constants::CONNECT_SRC, "connect-src"),
    (constants::FONT_SRC, "font-src"),
    (constants::OBJECT_SRC, "object-src"),
    (constants::MEDIA_SRC, "media-src"),
    (constants::FRAME_SRC, "frame-src"),
    (constants::WORKER_SRC, "worker-src"),
    (constants::MANIFEST_SRC, "manifest-src"),
    (constants::CHILD_SRC, "child-src"),
    (constants::FRAME_ANCESTORS, "frame-ancestors"),
    (constants::BASE_URI, "base-uri"),
    (constants::FORM_ACTION, "form-action"),
    (constants::SANDBOX, "sandbox"),
    (constants::SCRIPT_SRC_ELEM, "script-src-elem"),
    (constants::SCRIPT_SRC_ATTR, "script-src-attr"),
    (constants::STYLE_SRC_ELEM, "style-src-elem"),
    (constants::STYLE_SRC_ATTR, "style-src-attr"),
    (constants::PREFETCH_SRC, "prefetch-src"),
    (constants::UPGRADE_INSECURE_REQUESTS, "upgrade-insecure-requests"),
    (constants::BLOCK_ALL_MIXED_CONTENT, "block-all-mixed-content"),
    (constants::REQUIRE_TRUSTED_TYPES_FOR, "require-trusted-types-for"),
    (constants::TRUSTED_TYPES, "trusted-types"),
    (constants::REPORT_URI, "report-uri"),
    (constants::REPORT_TO, "report-to"),
];

static WIRE_NAME_MAP: OnceLock<FxHashMap<&'static str, &'static str>> = OnceLock::new();

/// Kebab-case header spelling of a snake_case directive name.
///
/// Known directives resolve through a static table; anything else has its
/// underscores replaced.
#[inline]
pub(crate) fn wire_name(name: &str) -> Cow<'static, str> {
    let map = WIRE_NAME_MAP.get_or_init(|| {
        let mut map = FxHashMap::with_capacity_and_hasher(WIRE_NAMES.len(), Default::default());
        for &(snake, kebab) in WIRE_NAMES {
            map.insert(snake, kebab);
        }
        map
    });

    match map.get(name) {
        Some(kebab) => Cow::Borrowed(kebab),
        None => Cow::Owned(name.replace('_', "-")),
    }
}

/// Canonical snake_case spelling of a directive name written in either form.
pub(crate) fn canonical_name(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    if trimmed
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(trimmed.to_ascii_lowercase().replace('-', "_"))
    }
}
