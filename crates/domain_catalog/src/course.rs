//! Courses and packs
//!
//! A course is an ordered set of priced items; a pack bundles several
//! courses plus items of its own. Both are immutable for the duration of a
//! billing request.

use serde::{Deserialize, Serialize};

use core_kernel::{CourseId, ProductId};

use crate::error::CatalogError;
use crate::product::{ItemType, PricedProduct};

/// A product with the quantity the course includes it at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseItem {
    pub product: PricedProduct,
    pub quantity: u32,
}

impl CourseItem {
    /// Creates a course item
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is zero.
    pub fn new(product: PricedProduct, quantity: u32) -> Result<Self, CatalogError> {
        if quantity == 0 {
            return Err(CatalogError::ZeroQuantity {
                product_id: product.id,
            });
        }
        Ok(Self { product, quantity })
    }

    /// Creates a course item with quantity 1
    pub fn single(product: PricedProduct) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }
}

/// A single course with its items in definition order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub items: Vec<CourseItem>,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, items: Vec<CourseItem>) -> Self {
        Self {
            id,
            name: name.into(),
            items,
        }
    }
}

/// A bundle of courses plus items sold directly on the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    pub id: CourseId,
    pub name: String,
    pub courses: Vec<Course>,
    pub direct_items: Vec<CourseItem>,
}

impl Pack {
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        courses: Vec<Course>,
        direct_items: Vec<CourseItem>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            courses,
            direct_items,
        }
    }
}

/// What a student enrolls into: one course, or a pack of courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CourseDefinition {
    Course(Course),
    Pack(Pack),
}

impl CourseDefinition {
    pub fn id(&self) -> CourseId {
        match self {
            CourseDefinition::Course(c) => c.id,
            CourseDefinition::Pack(p) => p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CourseDefinition::Course(c) => &c.name,
            CourseDefinition::Pack(p) => &p.name,
        }
    }

    /// All items in definition order.
    ///
    /// For a pack: every member course's items first (course order), then
    /// the pack's direct items.
    pub fn items(&self) -> Vec<&CourseItem> {
        match self {
            CourseDefinition::Course(c) => c.items.iter().collect(),
            CourseDefinition::Pack(p) => p
                .courses
                .iter()
                .flat_map(|c| c.items.iter())
                .chain(p.direct_items.iter())
                .collect(),
        }
    }

    /// Course ids to try, in order, when looking up per-course catalog data.
    ///
    /// A plain course yields itself; a pack yields its member courses in
    /// definition order.
    pub fn member_course_ids(&self) -> Vec<CourseId> {
        match self {
            CourseDefinition::Course(c) => vec![c.id],
            CourseDefinition::Pack(p) => p.courses.iter().map(|c| c.id).collect(),
        }
    }

    /// Selectable textbook items offered by this course or pack
    pub fn textbook_options(&self) -> Vec<&CourseItem> {
        self.items()
            .into_iter()
            .filter(|item| item.product.item_type == ItemType::Textbook)
            .collect()
    }

    /// Returns true if the given product is part of this definition
    pub fn offers_product(&self, product_id: ProductId) -> bool {
        self.items().iter().any(|item| item.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(name: &str, item_type: ItemType) -> PricedProduct {
        PricedProduct::new(ProductId::new(), name, item_type, dec!(1000))
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let result = CourseItem::new(product("Tuition", ItemType::Tuition), 0);
        assert!(matches!(result, Err(CatalogError::ZeroQuantity { .. })));
    }

    #[test]
    fn test_pack_items_preserve_definition_order() {
        let course_a = Course::new(
            CourseId::new(),
            "Math",
            vec![CourseItem::single(product("Math tuition", ItemType::Tuition))],
        );
        let course_b = Course::new(
            CourseId::new(),
            "English",
            vec![CourseItem::single(product(
                "English tuition",
                ItemType::Tuition,
            ))],
        );
        let pack = CourseDefinition::Pack(Pack::new(
            CourseId::new(),
            "Math + English",
            vec![course_a, course_b],
            vec![CourseItem::single(product("Pack bag", ItemType::Bag))],
        ));

        let names: Vec<&str> = pack
            .items()
            .iter()
            .map(|i| i.product.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Math tuition", "English tuition", "Pack bag"]);
    }

    #[test]
    fn test_member_course_ids_for_pack() {
        let course_a = Course::new(CourseId::new(), "Math", vec![]);
        let course_b = Course::new(CourseId::new(), "English", vec![]);
        let a_id = course_a.id;
        let b_id = course_b.id;

        let pack = CourseDefinition::Pack(Pack::new(
            CourseId::new(),
            "Bundle",
            vec![course_a, course_b],
            vec![],
        ));
        assert_eq!(pack.member_course_ids(), vec![a_id, b_id]);
    }

    #[test]
    fn test_textbook_options_filters_by_type() {
        let textbook = product("Grammar book", ItemType::Textbook);
        let textbook_id = textbook.id;
        let course = CourseDefinition::Course(Course::new(
            CourseId::new(),
            "English",
            vec![
                CourseItem::single(product("Tuition", ItemType::Tuition)),
                CourseItem::single(textbook),
            ],
        ));

        let options = course.textbook_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].product.id, textbook_id);
        assert!(course.offers_product(textbook_id));
    }
}
