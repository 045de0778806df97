//! Presentation types that make up an invoice template

use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Seller details printed in the invoice header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
}

impl CompanyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: None,
            address: None,
            phone: None,
            email: None,
            website: None,
            tax_code: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tax_code(mut self, tax_code: impl Into<String>) -> Self {
        self.tax_code = Some(tax_code.into());
        self
    }
}

/// Color palette, one CSS color string per role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub text_light: String,
    pub border: String,
    pub background: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            secondary: "#64748b".to_string(),
            accent: "#f59e0b".to_string(),
            text: "#1f2937".to_string(),
            text_light: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

/// Font family and pixel sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    pub family: String,
    pub size: FontSizes,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Inter, Arial, sans-serif".to_string(),
            size: FontSizes::default(),
        }
    }
}

/// Pixel sizes for each text level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSizes {
    pub title: f64,
    pub heading: f64,
    pub subheading: f64,
    pub body: f64,
    pub small: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 24.0,
            heading: 16.0,
            subheading: 14.0,
            body: 12.0,
            small: 10.0,
        }
    }
}

/// Input kind of a user-defined field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Textarea,
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "textarea" => Ok(Self::Textarea),
            other => Err(ModelError::UnknownVariant {
                kind: "field type",
                value: other.to_string(),
            }),
        }
    }
}

/// Invoice area a custom field is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSection {
    Header,
    Customer,
    Order,
    Footer,
}

/// A user-defined field shown on the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub section: FieldSection,
    pub order: u32,
    pub visible: bool,
    pub required: bool,
}

impl CustomField {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        section: FieldSection,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: String::new(),
            field_type,
            section,
            order: 0,
            visible: true,
            required: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// The closed set of layout section kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Header,
    CompanyInfo,
    CustomerInfo,
    OrderInfo,
    ItemsTable,
    Summary,
    Notes,
    Footer,
    Custom,
}

impl SectionType {
    /// All section kinds in canonical rendering order
    pub const ALL: [SectionType; 9] = [
        SectionType::Header,
        SectionType::CompanyInfo,
        SectionType::CustomerInfo,
        SectionType::OrderInfo,
        SectionType::ItemsTable,
        SectionType::Summary,
        SectionType::Notes,
        SectionType::Footer,
        SectionType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::CompanyInfo => "companyInfo",
            Self::CustomerInfo => "customerInfo",
            Self::OrderInfo => "orderInfo",
            Self::ItemsTable => "itemsTable",
            Self::Summary => "summary",
            Self::Notes => "notes",
            Self::Footer => "footer",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "section type",
                value: s.to_string(),
            })
    }
}

/// Column count of a section, serialized as the number 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SectionColumns {
    One,
    Two,
}

impl TryFrom<u8> for SectionColumns {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(ModelError::InvalidColumns(other)),
        }
    }
}

impl From<SectionColumns> for u8 {
    fn from(columns: SectionColumns) -> Self {
        match columns {
            SectionColumns::One => 1,
            SectionColumns::Two => 2,
        }
    }
}

/// A layout block of the rendered invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSection {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub order: u32,
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<SectionColumns>,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_html: Option<String>,
    /// Free-form style properties (CSS-like key/value pairs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, Value>>,
}

impl TemplateSection {
    pub fn new(id: impl Into<String>, section_type: SectionType, order: u32) -> Self {
        Self {
            id: id.into(),
            section_type,
            title: None,
            order,
            visible: true,
            columns: None,
            fields: Vec::new(),
            custom_html: None,
            style: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_columns(mut self, columns: SectionColumns) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Page setup used when printing the invoice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin: Margins,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin: Margins::uniform(20.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&SectionType::ItemsTable).unwrap(),
            "\"itemsTable\""
        );
        for kind in SectionType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<SectionType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_columns_accept_only_one_or_two() {
        let one: SectionColumns = serde_json::from_str("1").unwrap();
        assert_eq!(one, SectionColumns::One);
        assert_eq!(serde_json::to_string(&SectionColumns::Two).unwrap(), "2");
        assert!(serde_json::from_str::<SectionColumns>("3").is_err());
        assert_eq!(SectionColumns::try_from(0), Err(ModelError::InvalidColumns(0)));
    }

    #[test]
    fn test_custom_field_uses_type_key() {
        let field = CustomField::new("cf-1", "Mã số thuế", FieldType::Text, FieldSection::Customer)
            .with_value("0101234567")
            .with_order(2);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["section"], "customer");
        assert_eq!(json["order"], 2);
        assert!(json.get("fieldType").is_none());
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("textarea".parse::<FieldType>().unwrap(), FieldType::Textarea);
        assert!(matches!(
            "checkbox".parse::<FieldType>(),
            Err(ModelError::UnknownVariant { kind: "field type", .. })
        ));
    }

    #[test]
    fn test_page_layout_wire_format() {
        let json = serde_json::to_value(PageLayout::default()).unwrap();
        assert_eq!(json["pageSize"], "A4");
        assert_eq!(json["orientation"], "portrait");
        assert_eq!(json["margin"]["left"], 20.0);
    }

    #[test]
    fn test_company_optional_fields_omitted() {
        let company = CompanyInfo::new("Shop").with_tax_code("0312345678");
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["taxCode"], "0312345678");
        assert!(json.get("logo").is_none());
    }
}
