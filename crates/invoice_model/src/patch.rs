//! Partial updates of template content

use crate::{ColorScheme, CompanyInfo, CustomField, FontSettings, PageLayout, TemplateContent, TemplateSection};
use serde::{Deserialize, Serialize};

/// A set of content fields to overwrite; `None` leaves a field untouched.
///
/// Identity, the default flag and the creation timestamp are not part of a
/// patch and can never be changed through one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub company: Option<CompanyInfo>,
    pub colors: Option<ColorScheme>,
    pub font: Option<FontSettings>,
    pub custom_fields: Option<Vec<CustomField>>,
    pub sections: Option<Vec<TemplateSection>>,
    pub layout: Option<PageLayout>,
    pub show_border: Option<bool>,
    pub show_logo: Option<bool>,
    #[serde(rename = "showQRCode")]
    pub show_qr_code: Option<bool>,
    pub footer_text: Option<String>,
}

impl TemplatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn company(mut self, company: CompanyInfo) -> Self {
        self.company = Some(company);
        self
    }

    pub fn colors(mut self, colors: ColorScheme) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn sections(mut self, sections: Vec<TemplateSection>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn show_qr_code(mut self, show: bool) -> Self {
        self.show_qr_code = Some(show);
        self
    }

    pub fn footer_text(mut self, footer: impl Into<String>) -> Self {
        self.footer_text = Some(footer.into());
        self
    }

    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the provided fields of `content`
    pub fn apply_to(self, content: &mut TemplateContent) {
        if let Some(name) = self.name {
            content.name = name;
        }
        if let Some(description) = self.description {
            content.description = Some(description);
        }
        if let Some(company) = self.company {
            content.company = company;
        }
        if let Some(colors) = self.colors {
            content.colors = colors;
        }
        if let Some(font) = self.font {
            content.font = font;
        }
        if let Some(custom_fields) = self.custom_fields {
            content.custom_fields = custom_fields;
        }
        if let Some(sections) = self.sections {
            content.sections = sections;
        }
        if let Some(layout) = self.layout {
            content.layout = layout;
        }
        if let Some(show_border) = self.show_border {
            content.show_border = show_border;
        }
        if let Some(show_logo) = self.show_logo {
            content.show_logo = show_logo;
        }
        if let Some(show_qr_code) = self.show_qr_code {
            content.show_qr_code = show_qr_code;
        }
        if let Some(footer_text) = self.footer_text {
            content.footer_text = Some(footer_text);
        }
    }
}
