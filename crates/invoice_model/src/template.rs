//! Invoice template structures

use crate::{
    ColorScheme, CompanyInfo, CustomField, FontSettings, PageLayout, SectionColumns, SectionType,
    TemplateSection,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the reserved, undeletable template
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// Display name of the reserved template
pub const DEFAULT_TEMPLATE_NAME: &str = "Template mặc định";

/// Everything about a template except its identity, flag and timestamps.
///
/// This is also the shape accepted on import: identity keys present in the
/// input are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub company: CompanyInfo,
    pub colors: ColorScheme,
    pub font: FontSettings,
    pub custom_fields: Vec<CustomField>,
    pub sections: Vec<TemplateSection>,
    pub layout: PageLayout,
    pub show_border: bool,
    pub show_logo: bool,
    #[serde(rename = "showQRCode")]
    pub show_qr_code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl TemplateContent {
    /// Create content with the standard palette, font, sections and page setup
    pub fn new(name: impl Into<String>, company: CompanyInfo) -> Self {
        Self {
            name: name.into(),
            description: None,
            company,
            colors: ColorScheme::default(),
            font: FontSettings::default(),
            custom_fields: Vec::new(),
            sections: standard_sections(),
            layout: PageLayout::default(),
            show_border: true,
            show_logo: true,
            show_qr_code: true,
            footer_text: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer_text = Some(footer.into());
        self
    }

    pub fn with_custom_field(mut self, field: CustomField) -> Self {
        self.custom_fields.push(field);
        self
    }

    /// Same content under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// A named invoice-layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identity; `"default"` is reserved
    pub id: String,
    /// True only for the reserved default
    pub is_default: bool,
    #[serde(flatten)]
    pub content: TemplateContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Create a regular (non-default) template stamped with `now`
    pub fn new(id: impl Into<String>, content: TemplateContent, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            is_default: false,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// The reserved default template
    pub fn reserved_default(now: DateTime<Utc>) -> Self {
        let company = CompanyInfo::new("Cửa hàng của bạn")
            .with_address("Địa chỉ cửa hàng")
            .with_phone("0900 000 000")
            .with_email("contact@example.com");

        let content = TemplateContent::new(DEFAULT_TEMPLATE_NAME, company)
            .with_description("Mẫu hóa đơn mặc định")
            .with_footer("Cảm ơn quý khách đã mua hàng!");

        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            is_default: true,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.content.name
    }

    /// Whether this is the protected default entity
    pub fn is_reserved(&self) -> bool {
        self.id == DEFAULT_TEMPLATE_ID
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Sections in rendering order
    pub fn sorted_sections(&self) -> Vec<&TemplateSection> {
        let mut sections: Vec<_> = self.content.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }
}

fn standard_sections() -> Vec<TemplateSection> {
    vec![
        TemplateSection::new("header", SectionType::Header, 0)
            .with_title("HÓA ĐƠN BÁN HÀNG")
            .with_fields(["logo", "title", "invoiceNumber"]),
        TemplateSection::new("company", SectionType::CompanyInfo, 1)
            .with_fields(["name", "address", "phone", "email", "taxCode"]),
        TemplateSection::new("customer", SectionType::CustomerInfo, 2)
            .with_title("Thông tin khách hàng")
            .with_columns(SectionColumns::Two)
            .with_fields(["customerName", "customerPhone", "customerAddress"]),
        TemplateSection::new("order", SectionType::OrderInfo, 3)
            .with_columns(SectionColumns::Two)
            .with_fields(["orderId", "orderDate", "paymentMethod"]),
        TemplateSection::new("items", SectionType::ItemsTable, 4)
            .with_fields(["productName", "quantity", "price", "total"]),
        TemplateSection::new("summary", SectionType::Summary, 5)
            .with_fields(["subtotal", "discount", "shippingFee", "total"]),
        TemplateSection::new("notes", SectionType::Notes, 6)
            .with_title("Ghi chú")
            .with_fields(["note"]),
        TemplateSection::new("footer", SectionType::Footer, 7).with_fields(["footerText", "qrCode"]),
        TemplateSection::new("custom", SectionType::Custom, 8).hidden(),
    ]
}
