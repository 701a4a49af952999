//! Element records and their geometry / styling.

use pagebuilder_common::{now, IdGenerator, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Element identifier, unique across a page's whole tree
pub type ElementId = String;

/// Free-form element properties (content, category ids, limits, ...)
pub type Props = serde_json::Map<String, serde_json::Value>;

macro_rules! element_types {
    (
        containers { $($cvariant:ident => $cname:literal),* $(,)? }
        leaves { $($variant:ident => $name:literal),* $(,)? }
    ) => {
        /// Element type tag
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum ElementType {
            $($cvariant,)*
            $($variant,)*
            /// Tag written by a newer builder; kept verbatim as an opaque leaf
            Unknown(String),
        }

        impl ElementType {
            /// Every known tag, containers first
            pub const ALL: &'static [ElementType] = &[
                $(ElementType::$cvariant,)*
                $(ElementType::$variant,)*
            ];

            pub fn as_str(&self) -> &str {
                match self {
                    $(ElementType::$cvariant => $cname,)*
                    $(ElementType::$variant => $name,)*
                    ElementType::Unknown(tag) => tag.as_str(),
                }
            }

            /// Only container variants may own children
            pub fn is_container(&self) -> bool {
                matches!(self, $(ElementType::$cvariant)|*)
            }

            pub fn parse(tag: &str) -> Option<Self> {
                match tag {
                    $($cname => Some(ElementType::$cvariant),)*
                    $($name => Some(ElementType::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

element_types! {
    containers {
        Container => "container",
        Section => "section",
        Row => "row",
        Column => "column",
        Grid => "grid",
    }
    leaves {
        Spacer => "spacer",
        Divider => "divider",
        Text => "text",
        Heading => "heading",
        Image => "image",
        Button => "button",
        Icon => "icon",
        Badge => "badge",
        Header => "header",
        Footer => "footer",
        Menu => "menu",
        Breadcrumb => "breadcrumb",
        Tabs => "tabs",
        Hero => "hero",
        Card => "card",
        Gallery => "gallery",
        Video => "video",
        Testimonial => "testimonial",
        Faq => "faq",
        ProductConfigurator => "productConfigurator",
        ProductGrid => "productGrid",
        ProductFilters => "productFilters",
        ProductCarousel => "productCarousel",
        CatalogTree => "catalogTree",
        StepWizard => "stepWizard",
        ComparisonTable => "comparisonTable",
        PriceCalculator => "priceCalculator",
        DeliveryCalculator => "deliveryCalculator",
        DiscountCalculator => "discountCalculator",
        Cart => "cart",
        Wishlist => "wishlist",
        Comparison => "comparison",
        Search => "search",
        Form => "form",
        Input => "input",
        Textarea => "textarea",
        Select => "select",
        Checkbox => "checkbox",
        Radio => "radio",
        ProductFilter => "productFilter",
        PropertyFilter => "propertyFilter",
        FilteredProducts => "filteredProducts",
        Contact => "contact",
        Accordion => "accordion",
    }
}

impl ElementType {
    /// Known variant for `tag`, or `Unknown` holding it
    pub fn from_tag(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        ElementType::parse(&tag).unwrap_or(ElementType::Unknown(tag))
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ElementType::from_tag)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(200.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub min_width: f64,
    pub min_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            min_height: 50.0,
            max_width: Some(800.0),
            max_height: Some(600.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Spacing {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Visual style record; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

/// Everything about an element except its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementType,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub size: Size,

    #[serde(default)]
    pub constraints: Constraints,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Nested element as persisted in the document JSON
///
/// Inside an [`ElementTree`](crate::ElementTree) children live in the arena; this
/// shape is only used on the wire and when inserting whole subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub data: ElementData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl Element {
    /// Bare element with the given id; containers start with an empty child list
    pub fn new(id: impl Into<ElementId>, kind: ElementType) -> Self {
        let created = now();
        let children = kind.is_container().then(Vec::new);
        Self {
            data: ElementData {
                id: id.into(),
                kind,
                position: Position::default(),
                size: Size::default(),
                constraints: Constraints::default(),
                style: Style::default(),
                props: Props::new(),
                visible: None,
                locked: None,
                created_at: created,
                updated_at: created,
            },
            children,
        }
    }

    /// Freshly minted element as dropped from the components panel
    pub fn create(kind: ElementType, position: Position) -> Self {
        Self::create_with_size(kind, position, Size::default())
    }

    pub fn create_with_size(kind: ElementType, position: Position, size: Size) -> Self {
        let props = crate::defaults::default_props(&kind);
        let mut element = Self::new(IdGenerator::element(), kind);
        element.data.position = position;
        element.data.size = size;
        element.data.style = crate::defaults::default_style();
        element.data.props = props;
        element
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.data.props = props;
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    /// Number of elements in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(Element::subtree_len)
            .sum::<usize>()
    }
}
