//! Shallow patches for elements and pages.
//!
//! A patch field that is `Some` replaces the target field wholesale. In
//! particular `props` is never deep-merged: patching `{content: "hi"}` onto
//! `{content: "x", color: "red"}` leaves `{content: "hi"}`.

use crate::model::{Constraints, ElementData, ElementType, Position, Props, Size, Style};
use crate::page::{Page, PageSettings, Theme};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl ElementPatch {
    pub fn props(props: Props) -> Self {
        Self {
            props: Some(props),
            ..Self::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge onto `data`; returns false when the type change was refused
    ///
    /// A node that owns children keeps its container type.
    pub(crate) fn apply_to(&self, data: &mut ElementData, has_children: bool) -> bool {
        let mut accepted = true;

        if let Some(kind) = &self.kind {
            if has_children && !kind.is_container() {
                accepted = false;
            } else {
                data.kind = kind.clone();
            }
        }
        if let Some(position) = self.position {
            data.position = position;
        }
        if let Some(size) = self.size {
            data.size = size;
        }
        if let Some(constraints) = self.constraints {
            data.constraints = constraints;
        }
        if let Some(style) = &self.style {
            data.style = style.clone();
        }
        if let Some(props) = &self.props {
            data.props = props.clone();
        }
        if let Some(visible) = self.visible {
            data.visible = Some(visible);
        }
        if let Some(locked) = self.locked {
            data.locked = Some(locked);
        }

        accepted
    }
}

/// Page-level fields that may be patched; elements are edited separately
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<PageSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl PagePatch {
    pub(crate) fn apply_to(&self, page: &mut Page) {
        if let Some(name) = &self.name {
            page.name = name.clone();
        }
        if let Some(slug) = &self.slug {
            page.slug = slug.clone();
        }
        if let Some(description) = &self.description {
            page.description = Some(description.clone());
        }
        if let Some(settings) = &self.settings {
            page.settings = settings.clone();
        }
        if let Some(theme) = &self.theme {
            page.theme = theme.clone();
        }
    }
}
