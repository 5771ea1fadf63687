//! Page rendering
//!
//! One `render` call draws every visible field of one copy onto one page.
//! The renderer owns data-dependent visibility (absent values are skipped,
//! the emergency block needs the senior-watch option); the placement table
//! owns form geometry. Any failed draw aborts the whole page; a half-filled
//! page is not a supported state.

use crate::model::{Application, ApplicationType, Gender, OptionCode, PaymentMethod};
use crate::placement::{renewal_note_box, resolve_placement, FieldKey, Placement, LINE_HEIGHT, RESIDENT_SLOTS};
use crate::{FormError, Result};
use jp_text::{fit_text, split_lines, DateTokens};

/// Mark drawn into the pre-printed checkboxes
const CHECKMARK: &str = "✓";

/// Which of the two copies a page is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyType {
    /// 販売店控
    Agency,
    /// お客様控
    Customer,
}

/// Drawing primitives a page render needs
///
/// Coordinates are points from the top-left of the page. The production
/// implementation targets a `pdf_overlay::PdfDocument` page; tests use a
/// recording surface to assert on the emitted draw calls.
pub trait PageSurface {
    fn draw_text(&mut self, text: &str, x: f64, y: f64, font_size: f64) -> Result<()>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;
}

/// Renders one application onto one page surface
pub struct PageRenderer<'a> {
    application: &'a Application,
}

impl<'a> PageRenderer<'a> {
    pub fn new(application: &'a Application) -> Self {
        Self { application }
    }

    /// Draw every visible field. Both copies share the same layout; the
    /// copy labels are pre-printed on the template pages.
    pub fn render(&self, surface: &mut dyn PageSurface) -> Result<()> {
        self.draw_application_type(surface)?;
        self.draw_date(surface, &self.application.application_date, [
            FieldKey::ApplicationYear,
            FieldKey::ApplicationMonth,
            FieldKey::ApplicationDay,
        ])?;
        self.draw_options(surface)?;
        self.draw_applicant(surface)?;
        self.draw_residents(surface)?;
        self.draw_property(surface)?;
        self.draw_service_period(surface)?;
        self.draw_renewal_note(surface)?;
        self.draw_field(surface, FieldKey::GuaranteeNumber, &self.application.guarantee_number)?;
        self.draw_field(surface, FieldKey::ServicePrice, &self.application.service_price)?;
        self.draw_emergency_contact(surface)?;
        self.draw_agent(surface)?;
        Ok(())
    }

    /// Draw one field if the form has a box for it and the value is present
    fn draw_field(&self, surface: &mut dyn PageSurface, field: FieldKey, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        let Some(placement) = self.placement(field) else {
            return Ok(());
        };

        if placement.two_line {
            return self.draw_wrapped(surface, &placement, value);
        }

        let text = match placement.max_width {
            Some(width) => fit_text(value, width, placement.font_size),
            None => value.to_string(),
        };
        surface.draw_text(&text, placement.x, placement.y, placement.font_size)
    }

    /// Draw a two-line box, one line offset below the other
    fn draw_wrapped(
        &self,
        surface: &mut dyn PageSurface,
        placement: &Placement,
        value: &str,
    ) -> Result<()> {
        let width = placement.max_width.unwrap_or(f64::MAX);
        for (index, line) in split_lines(value, width, placement.font_size).iter().enumerate() {
            surface.draw_text(
                line,
                placement.x,
                placement.y + index as f64 * LINE_HEIGHT,
                placement.font_size,
            )?;
        }
        Ok(())
    }

    /// Decompose an ISO date into the three form boxes
    fn draw_date(
        &self,
        surface: &mut dyn PageSurface,
        iso: &str,
        fields: [FieldKey; 3],
    ) -> Result<()> {
        if iso.is_empty() {
            return Ok(());
        }
        let tokens = DateTokens::parse(iso)
            .map_err(|e| FormError::Render(e.to_string()))?;

        for (field, token) in fields.into_iter().zip([&tokens.year, &tokens.month, &tokens.day]) {
            if let Some(placement) = self.placement(field) {
                surface.draw_text(token, placement.x, placement.y, placement.font_size)?;
            }
        }
        Ok(())
    }

    fn draw_application_type(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let field = match self.application.application_type {
            Some(ApplicationType::New) => FieldKey::ApplicationTypeNew,
            Some(ApplicationType::Renewal) => FieldKey::ApplicationTypeRenewal,
            None => return Ok(()),
        };
        self.draw_check(surface, field)
    }

    fn draw_options(&self, surface: &mut dyn PageSurface) -> Result<()> {
        for option in [
            OptionCode::NeighborTrouble,
            OptionCode::SeniorWatch,
            OptionCode::ApplianceSupport,
        ] {
            if self.application.has_option(option) {
                self.draw_check(surface, FieldKey::OptionCheck(option))?;
            }
        }
        Ok(())
    }

    fn draw_applicant(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let applicant = &self.application.applicant;
        self.draw_field(surface, FieldKey::ApplicantNameKana, &applicant.name_kana)?;
        self.draw_field(surface, FieldKey::ApplicantHomePhone, &applicant.home_phone)?;
        self.draw_field(surface, FieldKey::ApplicantName, &applicant.name)?;
        self.draw_field(surface, FieldKey::ApplicantMobilePhone, &applicant.mobile_phone)?;
        self.draw_date(surface, &self.application.birth_date, [
            FieldKey::BirthYear,
            FieldKey::BirthMonth,
            FieldKey::BirthDay,
        ])?;

        match applicant.gender {
            Some(Gender::Male) => self.draw_check(surface, FieldKey::GenderMale)?,
            Some(Gender::Female) => self.draw_check(surface, FieldKey::GenderFemale)?,
            None => {}
        }
        Ok(())
    }

    fn draw_residents(&self, surface: &mut dyn PageSurface) -> Result<()> {
        for (slot, resident) in self.application.residents.iter().take(RESIDENT_SLOTS).enumerate() {
            self.draw_field(surface, FieldKey::ResidentNameKana(slot), &resident.name_kana)?;
            self.draw_field(surface, FieldKey::ResidentRelationship(slot), &resident.relationship)?;
            self.draw_field(surface, FieldKey::ResidentName(slot), &resident.name)?;
        }
        Ok(())
    }

    fn draw_property(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let property = &self.application.property;
        self.draw_field(surface, FieldKey::PropertyAddress, &property.address)?;
        self.draw_field(surface, FieldKey::PropertyNameKana, &property.name_kana)?;
        self.draw_field(surface, FieldKey::PropertyRoomNumber, &property.room_number)?;
        self.draw_field(surface, FieldKey::PropertyName, &property.name)?;
        Ok(())
    }

    fn draw_service_period(&self, surface: &mut dyn PageSurface) -> Result<()> {
        // Older submissions carry the start date only as the application date
        let start = if self.application.service_period_start_date.is_empty() {
            &self.application.application_date
        } else {
            &self.application.service_period_start_date
        };
        self.draw_date(surface, start, [
            FieldKey::ServicePeriodYear,
            FieldKey::ServicePeriodMonth,
            FieldKey::ServicePeriodDay,
        ])
    }

    fn draw_renewal_note(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let Some(placement) = self.placement(FieldKey::RenewalNote) else {
            return Ok(());
        };

        if let Some((x, y, w, h)) =
            renewal_note_box(self.application.product, self.application.payment_method)
        {
            surface.fill_rect(x, y, w, h)?;
        }

        let note = match self.application.payment_method {
            PaymentMethod::Yearly1 => "から１年後応答月の月末まで",
            _ => "から２年後応答月の月末まで",
        };
        surface.draw_text(note, placement.x, placement.y, placement.font_size)
    }

    fn draw_emergency_contact(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let contact = &self.application.emergency_contact;
        // The section belongs to the senior-watch option
        if !self.application.has_option(OptionCode::SeniorWatch) || contact.name.is_empty() {
            return Ok(());
        }

        self.draw_field(surface, FieldKey::EmergencyNameKana, &contact.name_kana)?;
        self.draw_field(surface, FieldKey::EmergencyHomePhone, &contact.home_phone)?;
        self.draw_field(surface, FieldKey::EmergencyName, &contact.name)?;
        self.draw_field(surface, FieldKey::EmergencyMobilePhone, &contact.mobile_phone)?;
        self.draw_field(surface, FieldKey::EmergencyRelationship, &contact.relationship)?;
        self.draw_field(surface, FieldKey::EmergencyAddress, &contact.address)?;
        Ok(())
    }

    fn draw_agent(&self, surface: &mut dyn PageSurface) -> Result<()> {
        let agent = &self.application.agent_info;
        self.draw_field(surface, FieldKey::AgentName, &agent.name)?;
        self.draw_field(surface, FieldKey::AgentCode, &agent.code)?;
        self.draw_field(surface, FieldKey::AgentPhone, &agent.phone)?;
        self.draw_field(surface, FieldKey::AgentRepresentative, &agent.representative_name)?;
        Ok(())
    }

    fn draw_check(&self, surface: &mut dyn PageSurface, field: FieldKey) -> Result<()> {
        if let Some(placement) = self.placement(field) {
            surface.draw_text(CHECKMARK, placement.x, placement.y, placement.font_size)?;
        }
        Ok(())
    }

    fn placement(&self, field: FieldKey) -> Option<Placement> {
        resolve_placement(field, self.application.product, self.application.payment_method)
    }
}
