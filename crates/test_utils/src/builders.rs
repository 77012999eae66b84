//! Test Data Builders
//!
//! Builder patterns for constructing catalog data with sensible defaults.
//! Tests specify only the fields they care about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CourseId, ProductId};
use domain_catalog::{
    Course, CourseDefinition, CourseItem, ItemType, Pack, PriceTableKind, PricedProduct,
};

/// Builder for constructing test products
pub struct ProductBuilder {
    id: ProductId,
    display_name: String,
    item_type: ItemType,
    base_price: Decimal,
    tax_rate: Option<Decimal>,
    overrides: Vec<(PriceTableKind, u32, Decimal)>,
}

impl ProductBuilder {
    /// Creates a builder for an arbitrary item type
    pub fn new(item_type: ItemType, display_name: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            id: ProductId::new(),
            display_name: display_name.into(),
            item_type,
            base_price,
            tax_rate: None,
            overrides: Vec::new(),
        }
    }

    /// Weekly tuition at ¥26,000
    pub fn tuition() -> Self {
        Self::new(ItemType::Tuition, "Weekly tuition", dec!(26000))
    }

    /// Facility fee at ¥2,000
    pub fn facility() -> Self {
        Self::new(ItemType::Facility, "Facility fee", dec!(2000))
    }

    /// Monthly fee at ¥1,000
    pub fn monthly_fee() -> Self {
        Self::new(ItemType::MonthlyFee, "Monthly fee", dec!(1000))
    }

    /// Enrollment fee at ¥11,000
    pub fn enrollment_fee() -> Self {
        Self::new(ItemType::Enrollment, "Enrollment fee", dec!(11000))
    }

    /// Enrollment textbook at ¥3,000
    pub fn enrollment_textbook() -> Self {
        Self::new(
            ItemType::EnrollmentTextbook,
            "Enrollment textbook",
            dec!(3000),
        )
    }

    /// Selectable textbook at ¥1,500
    pub fn textbook() -> Self {
        Self::new(ItemType::Textbook, "Textbook", dec!(1500))
    }

    /// School bag at ¥2,000
    pub fn bag() -> Self {
        Self::new(ItemType::Bag, "School bag", dec!(2000))
    }

    /// Ticket bundle priced at ¥3,000 per ticket
    pub fn ticket_bundle(ticket_count: u32) -> Self {
        Self::new(
            ItemType::EnrollmentTuition,
            format!("{ticket_count}-ticket bundle"),
            Decimal::from(ticket_count) * dec!(3000),
        )
    }

    /// Sets the product id
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Sets the base price
    pub fn with_base_price(mut self, price: Decimal) -> Self {
        self.base_price = price;
        self
    }

    /// Sets the tax rate
    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    /// Adds a month override price
    pub fn with_override(mut self, kind: PriceTableKind, month: u32, price: Decimal) -> Self {
        self.overrides.push((kind, month, price));
        self
    }

    /// Builds the product
    pub fn build(self) -> PricedProduct {
        let mut product =
            PricedProduct::new(self.id, self.display_name, self.item_type, self.base_price);
        if let Some(rate) = self.tax_rate {
            product = product.with_tax_rate(rate);
        }
        for (kind, month, price) in self.overrides {
            product = product.with_price_override(kind, month, price);
        }
        product
    }
}

/// Builder for constructing test courses
pub struct CourseBuilder {
    id: CourseId,
    name: String,
    items: Vec<CourseItem>,
}

impl CourseBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CourseId::new(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Sets the course id
    pub fn with_id(mut self, id: CourseId) -> Self {
        self.id = id;
        self
    }

    /// Adds a product at quantity 1
    pub fn with_product(mut self, product: PricedProduct) -> Self {
        self.items.push(CourseItem::single(product));
        self
    }

    /// Adds a product at the given quantity
    pub fn with_product_quantity(mut self, product: PricedProduct, quantity: u32) -> Self {
        self.items.push(
            CourseItem::new(product, quantity).expect("builder quantities are positive"),
        );
        self
    }

    /// Builds a plain course
    pub fn build(self) -> CourseDefinition {
        CourseDefinition::Course(self.build_course())
    }

    /// Builds the inner course value, for embedding into packs
    pub fn build_course(self) -> Course {
        Course::new(self.id, self.name, self.items)
    }
}

/// Builder for constructing test packs
pub struct PackBuilder {
    id: CourseId,
    name: String,
    courses: Vec<Course>,
    direct_items: Vec<CourseItem>,
}

impl PackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CourseId::new(),
            name: name.into(),
            courses: Vec::new(),
            direct_items: Vec::new(),
        }
    }

    /// Adds a member course
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a direct item at quantity 1
    pub fn with_direct_product(mut self, product: PricedProduct) -> Self {
        self.direct_items.push(CourseItem::single(product));
        self
    }

    /// Builds the pack
    pub fn build(self) -> CourseDefinition {
        CourseDefinition::Pack(Pack::new(self.id, self.name, self.courses, self.direct_items))
    }
}
