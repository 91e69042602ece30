//! The element base of the KML object model.
//!
//! Every concrete KML element embeds an [`ElementBase`] and implements the
//! [`Element`] trait. The base holds what all elements share: the type tag,
//! the single parent link, character data, and everything parsing found but
//! could not attach to a typed field:
//!
//! - fully unknown markup, kept verbatim as strings
//! - known elements in a position that does not accept them ("misplaced")
//! - attributes no layer recognized
//!
//! # Dispatch
//!
//! Concrete elements override [`Element::add_element`] and
//! [`Element::parse_attributes`] to recognize what they declare, then hand
//! the remainder to the layer below them (`Placemark` → `Feature` →
//! `Object`) and finally to [`ElementBase`], which keeps whatever is left.
//!
//! # Ownership
//!
//! Children are owned through `Box`es in the parent's fields. The parent
//! link is a non-owning [`ElementId`] and is set at most once, by
//! [`ElementBase::set_parent`].

use std::any::Any;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use kmlbase::Attributes;
use tracing::{debug, warn};

use crate::kml22::KmlDomType;
use crate::serializer::Serializer;
use crate::unknown::UnknownElement;

/// An owned, type-erased element.
pub type ElementPtr = Box<dyn Element>;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an element.
///
/// Used as the parent back-reference; it never keeps the parent alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ElementId(NonZeroU64);

impl ElementId {
    fn next() -> Self {
        let raw = NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// The raw, non-zero identity value
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// A node of the KML object model.
///
/// Implementors embed an [`ElementBase`] in a field named `base` and use
/// [`impl_element_base!`](crate::impl_element_base) for the accessor
/// methods. The provided methods implement the base behavior; overrides
/// recognize what the concrete type declares and delegate the rest.
pub trait Element: fmt::Debug + 'static {
    fn base(&self) -> &ElementBase;
    fn base_mut(&mut self) -> &mut ElementBase;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn dom_type(&self) -> KmlDomType {
        self.base().dom_type()
    }

    /// Whether this element is `dom_type` or derives from it.
    ///
    /// The base answers true only for `Unknown`.
    fn is_a(&self, dom_type: KmlDomType) -> bool {
        dom_type == KmlDomType::Unknown
    }

    /// Offer a parsed child to this element.
    ///
    /// A recognized child is moved into a typed field (simple children are
    /// converted and dropped). Anything else ends up in the base as a
    /// misplaced element or an unknown fragment.
    fn add_element(&mut self, element: ElementPtr) {
        self.base_mut().add_element(element);
    }

    /// Consume recognized attributes and keep the remainder as unknown.
    fn parse_attributes(&mut self, attributes: Attributes) {
        self.base_mut().parse_attributes(attributes);
    }

    /// Add this element's attributes to `attributes`, known ones first.
    fn get_attributes(&self, attributes: &mut Attributes) {
        self.base().get_attributes(attributes);
    }

    /// Receive the character data collected while parsing this element.
    fn set_char_data(&mut self, char_data: String) {
        self.base_mut().set_char_data(char_data);
    }

    fn serialize(&self, _serializer: &mut dyn Serializer) {}

    fn try_set_bool(&self, _val: &mut bool) -> bool {
        false
    }

    fn try_set_double(&self, _val: &mut f64) -> bool {
        false
    }

    fn try_set_int(&self, _val: &mut i32) -> bool {
        false
    }

    fn try_set_enum(&self, _val: &mut i32) -> bool {
        false
    }

    fn try_set_string(&self, _val: &mut String) -> bool {
        false
    }
}

/// Implements the accessor methods of [`Element`] for a struct with an
/// [`ElementBase`] field named `base`.
#[macro_export]
macro_rules! impl_element_base {
    () => {
        fn base(&self) -> &$crate::ElementBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::ElementBase {
            &mut self.base
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
            self
        }
    };
}

/// Recover the concrete type of an owned element.
///
/// Returns the element unchanged when it is not a `T`.
pub fn downcast<T: Element>(element: ElementPtr) -> Result<Box<T>, ElementPtr> {
    if !element.as_any().is::<T>() {
        return Err(element);
    }
    // `Box<dyn Any>` cannot be turned back into an `ElementPtr`, so the
    // type is checked first and this conversion always succeeds
    match element.into_any().downcast::<T>() {
        Ok(concrete) => Ok(concrete),
        Err(_) => unreachable!("concrete type is T"),
    }
}

/// Borrow an element as its concrete type
pub fn downcast_ref<T: Element>(element: &dyn Element) -> Option<&T> {
    element.as_any().downcast_ref::<T>()
}

/// State shared by every element.
#[derive(Debug)]
pub struct ElementBase {
    id: ElementId,
    dom_type: KmlDomType,
    parent: Option<ElementId>,
    default_xmlns: Option<String>,
    char_data: String,
    // Non-KML markup, verbatim
    unknown_elements: Vec<String>,
    // KML elements in illegal positions, e.g. <Placemark><Document>
    misplaced_elements: Vec<ElementPtr>,
    // Allocated on the first unrecognized attribute
    unknown_attributes: Option<Attributes>,
}

impl ElementBase {
    pub fn new(dom_type: KmlDomType) -> Self {
        Self {
            id: ElementId::next(),
            dom_type,
            parent: None,
            default_xmlns: None,
            char_data: String::new(),
            unknown_elements: Vec::new(),
            misplaced_elements: Vec::new(),
            unknown_attributes: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn dom_type(&self) -> KmlDomType {
        self.dom_type
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Record `parent` as this element's parent.
    ///
    /// Fails without changing anything if a parent is already set or if
    /// `parent` is this element.
    pub fn set_parent(&mut self, parent: ElementId) -> bool {
        if self.parent.is_some() || parent == self.id {
            return false;
        }
        self.parent = Some(parent);
        true
    }

    pub fn default_xmlns(&self) -> Option<&str> {
        self.default_xmlns.as_deref()
    }

    pub fn set_default_xmlns(&mut self, xmlns: impl Into<String>) {
        self.default_xmlns = Some(xmlns.into());
    }

    /// Concatenation of all character data found parsing this element
    pub fn char_data(&self) -> &str {
        &self.char_data
    }

    pub fn set_char_data(&mut self, char_data: impl Into<String>) {
        self.char_data = char_data.into();
    }

    /// Keep a fully unknown element (and its children) in raw XML form.
    pub fn add_unknown_element(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        debug!(parent = ?self.dom_type, len = markup.len(), "kept unknown element");
        self.unknown_elements.push(markup);
    }

    pub fn unknown_elements(&self) -> &[String] {
        &self.unknown_elements
    }

    pub fn misplaced_elements(&self) -> &[ElementPtr] {
        &self.misplaced_elements
    }

    /// Attributes no layer recognized. `None` until the first one is seen.
    pub fn unknown_attributes(&self) -> Option<&Attributes> {
        self.unknown_attributes.as_ref()
    }

    /// Last resort for a child no layer recognized.
    ///
    /// Raw unknown markup is kept as a string. Any other element is kept as
    /// misplaced if it can be parented here; an element that already has a
    /// parent is not taken.
    pub fn add_element(&mut self, element: ElementPtr) {
        let element = if element.dom_type() == KmlDomType::Unknown {
            match downcast::<UnknownElement>(element) {
                Ok(unknown) => {
                    self.add_unknown_element(unknown.into_markup());
                    return;
                }
                Err(element) => element,
            }
        } else {
            element
        };
        self.add_misplaced_element(element);
    }

    fn add_misplaced_element(&mut self, mut element: ElementPtr) {
        if element.base_mut().set_parent(self.id) {
            debug!(parent = ?self.dom_type, child = ?element.dom_type(), "kept misplaced element");
            self.misplaced_elements.push(element);
        } else {
            warn!(
                parent = ?self.dom_type,
                child = ?element.dom_type(),
                "rejected element that already has a parent"
            );
        }
    }

    /// Keep the attributes no layer above consumed.
    pub fn parse_attributes(&mut self, attributes: Attributes) {
        if attributes.is_empty() {
            return;
        }
        debug!(element = ?self.dom_type, count = attributes.len(), "kept unknown attributes");
        match &mut self.unknown_attributes {
            Some(unknown) => unknown.merge(&attributes),
            None => self.unknown_attributes = Some(attributes),
        }
    }

    /// Append the default namespace and the unknown attributes.
    pub fn get_attributes(&self, attributes: &mut Attributes) {
        if let Some(xmlns) = &self.default_xmlns {
            attributes.set_value("xmlns", xmlns.as_str());
        }
        if let Some(unknown) = &self.unknown_attributes {
            attributes.merge(unknown);
        }
    }

    /// True when unknown markup or misplaced elements were kept
    pub fn has_unknown_children(&self) -> bool {
        !self.unknown_elements.is_empty() || !self.misplaced_elements.is_empty()
    }

    /// True when nothing beyond the type and character data was kept
    pub fn is_plain(&self) -> bool {
        self.unknown_attributes.is_none() && !self.has_unknown_children()
    }

    /// Write stray character data, unknown markup, then misplaced elements.
    ///
    /// Complex elements call this last, before closing their tag. Stray
    /// text is trimmed; whitespace-only text is not written.
    pub fn serialize_unknown(&self, serializer: &mut dyn Serializer) {
        let stray = self.char_data.trim();
        if !stray.is_empty() {
            serializer.save_char_data(stray);
        }
        self.serialize_unknown_children(serializer);
    }

    /// Write unknown markup, then misplaced elements, in parse order.
    pub(crate) fn serialize_unknown_children(&self, serializer: &mut dyn Serializer) {
        for markup in &self.unknown_elements {
            serializer.save_unknown(markup);
        }
        for element in &self.misplaced_elements {
            serializer.save_element(element.as_ref());
        }
    }

    /// Install `child` in a single-valued field owned by this element.
    ///
    /// `None` clears the field. Otherwise the child is parented here and
    /// replaces (drops) the previous occupant. A child that already has a
    /// parent is handed back and the field is left untouched.
    pub fn set_complex_child<T: Element + ?Sized>(
        &self,
        child: Option<Box<T>>,
        field: &mut Option<Box<T>>,
    ) -> Result<(), Box<T>> {
        match child {
            None => {
                *field = None;
                Ok(())
            }
            Some(mut child) => {
                if child.base_mut().set_parent(self.id) {
                    *field = Some(child);
                    Ok(())
                } else {
                    Err(child)
                }
            }
        }
    }

    /// Append `child` to a repeatable field owned by this element.
    ///
    /// `None` is ignored. A child that already has a parent is handed back
    /// and the vector is left untouched.
    pub fn add_complex_child<T: Element + ?Sized>(
        &self,
        child: Option<Box<T>>,
        children: &mut Vec<Box<T>>,
    ) -> Result<(), Box<T>> {
        let Some(mut child) = child else {
            return Ok(());
        };
        if child.base_mut().set_parent(self.id) {
            children.push(child);
            Ok(())
        } else {
            Err(child)
        }
    }
}

/// Open `element` in `serializer` with its full attribute set.
pub(crate) fn begin_element(element: &dyn Element, serializer: &mut dyn Serializer) {
    let mut attributes = Attributes::new();
    element.get_attributes(&mut attributes);
    serializer.begin_by_id(element.dom_type(), &attributes);
}

/// Write a text-valued element.
///
/// Kept unknown markup and misplaced elements follow the text inside the
/// same tag.
pub(crate) fn save_text_element(
    element: &dyn Element,
    serializer: &mut dyn Serializer,
    text: &str,
) {
    let mut attributes = Attributes::new();
    element.get_attributes(&mut attributes);
    let base = element.base();
    if !base.has_unknown_children() {
        serializer.save_simple_element(element.dom_type(), &attributes, text);
        return;
    }
    serializer.begin_mixed_by_id(element.dom_type(), &attributes);
    if !text.is_empty() {
        serializer.save_char_data(text);
    }
    base.serialize_unknown_children(serializer);
    serializer.end_mixed_by_id(element.dom_type());
}
