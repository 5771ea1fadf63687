//! Application data model
//!
//! The wire shape matches the browser form submission: camelCase keys,
//! kebab-case enum values. Every free-text field is optional; the form
//! frontend sends the literal 「未入力」 for fields the user skipped, so
//! `normalized()` coerces that sentinel (and whitespace-only strings) to
//! empty before anything downstream looks at the data. Downstream code only
//! ever reasons about "present or absent", never about the magic string.

use crate::{FormError, Result};
use serde::{Deserialize, Serialize};

/// Placeholder the form frontend sends for untouched fields
pub const SENTINEL: &str = "未入力";

/// The four fixed product SKUs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    #[serde(rename = "anshin-support-24")]
    AnshinSupport24,
    #[serde(rename = "home-assist-24")]
    HomeAssist24,
    AnshinFullSupport,
    IerabuAnshinSupport,
}

impl Product {
    /// Identifier used in template file names
    pub fn id(&self) -> &'static str {
        match self {
            Product::AnshinSupport24 => "anshin-support-24",
            Product::HomeAssist24 => "home-assist-24",
            Product::AnshinFullSupport => "anshin-full-support",
            Product::IerabuAnshinSupport => "ierabu-anshin-support",
        }
    }

    /// Human-readable product name
    pub fn label(&self) -> &'static str {
        match self {
            Product::AnshinSupport24 => "あんしんサポート２４",
            Product::HomeAssist24 => "ホームアシスト２４",
            Product::AnshinFullSupport => "あんしんフルサポート",
            Product::IerabuAnshinSupport => "いえらぶ安心サポート",
        }
    }

    /// Whether this SKU uses the standard form layout
    ///
    /// いえらぶ安心サポート has its own pre-printed form: no option
    /// checkboxes, no resident or emergency-contact sections, no service
    /// period, and the property and agent blocks sit at different positions.
    pub fn has_standard_layout(&self) -> bool {
        !matches!(self, Product::IerabuAnshinSupport)
    }

    /// Payment cadences offered for this SKU
    pub fn allowed_cadences(&self) -> &'static [PaymentMethod] {
        match self {
            Product::AnshinSupport24 | Product::HomeAssist24 => &[
                PaymentMethod::Monthly,
                PaymentMethod::Yearly2,
                PaymentMethod::Yearly1,
            ],
            Product::AnshinFullSupport => &[PaymentMethod::Monthly],
            Product::IerabuAnshinSupport => &[PaymentMethod::Yearly2],
        }
    }
}

/// Payment cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly-1")]
    Yearly1,
    #[serde(rename = "yearly-2")]
    Yearly2,
}

impl PaymentMethod {
    pub fn is_yearly(&self) -> bool {
        matches!(self, PaymentMethod::Yearly1 | PaymentMethod::Yearly2)
    }
}

/// New application or contract renewal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationType {
    New,
    Renewal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
}

/// Service add-on option codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionCode {
    NeighborTrouble,
    SeniorWatch,
    ApplianceSupport,
}

impl OptionCode {
    pub fn label(&self) -> &'static str {
        match self {
            OptionCode::NeighborTrouble => "近隣トラブル解決サポート",
            OptionCode::SeniorWatch => "シニア向け見守りサポート",
            OptionCode::ApplianceSupport => "家電サポート",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Applicant {
    pub name: String,
    pub name_kana: String,
    pub mobile_phone: String,
    pub home_phone: String,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resident {
    pub name: String,
    pub name_kana: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub address: String,
    pub name: String,
    pub name_kana: String,
    pub room_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub name_kana: String,
    pub address: String,
    pub home_phone: String,
    pub mobile_phone: String,
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentInfo {
    pub name: String,
    pub phone: String,
    pub code: String,
    pub representative_name: String,
}

/// A single form submission
///
/// Constructed once per request, consumed by one `generate` call, then
/// discarded. `product` and `paymentMethod` are the only structurally
/// required keys; everything else degrades to "absent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub product: Product,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub application_type: Option<ApplicationType>,
    #[serde(default)]
    pub application_date: String,
    #[serde(default)]
    pub service_period_start_date: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub applicant: Applicant,
    #[serde(default)]
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub property: Property,
    #[serde(default)]
    pub selected_options: Vec<OptionCode>,
    #[serde(default)]
    pub service_price: String,
    #[serde(default)]
    pub guarantee_number: String,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub agent_info: AgentInfo,
}

/// Coerce a sentinel or whitespace-only value to absent
fn clean(value: &mut String) {
    if value.trim().is_empty() || value == SENTINEL {
        value.clear();
    }
}

impl Application {
    /// Parse a submission from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self> {
        let application: Application = serde_json::from_str(json)
            .map_err(|e| FormError::InputShape(e.to_string()))?;
        Ok(application.normalized())
    }

    /// Apply sentinel normalization to every free-text field
    pub fn normalized(mut self) -> Self {
        clean(&mut self.application_date);
        clean(&mut self.service_period_start_date);
        clean(&mut self.birth_date);
        clean(&mut self.service_price);
        clean(&mut self.guarantee_number);

        clean(&mut self.applicant.name);
        clean(&mut self.applicant.name_kana);
        clean(&mut self.applicant.mobile_phone);
        clean(&mut self.applicant.home_phone);

        for resident in &mut self.residents {
            clean(&mut resident.name);
            clean(&mut resident.name_kana);
            clean(&mut resident.relationship);
        }

        clean(&mut self.property.address);
        clean(&mut self.property.name);
        clean(&mut self.property.name_kana);
        clean(&mut self.property.room_number);

        clean(&mut self.emergency_contact.name);
        clean(&mut self.emergency_contact.name_kana);
        clean(&mut self.emergency_contact.address);
        clean(&mut self.emergency_contact.home_phone);
        clean(&mut self.emergency_contact.mobile_phone);
        clean(&mut self.emergency_contact.relationship);

        clean(&mut self.agent_info.name);
        clean(&mut self.agent_info.phone);
        clean(&mut self.agent_info.code);
        clean(&mut self.agent_info.representative_name);

        self
    }

    /// Whether the given option was selected
    pub fn has_option(&self, option: OptionCode) -> bool {
        self.selected_options.contains(&option)
    }
}
