//! Field placement resolution
//!
//! The output is a fixed pre-printed form whose boxes sit at absolute
//! positions, so placement is a lookup, not a layout computation. Everything
//! position-related lives in this one table: which box a field lands in,
//! at what size, how wide the box is, and whether the field exists at all
//! for the given product and payment cadence.
//!
//! Coordinates are points from the top-left of the page; the overlay layer
//! converts to PDF bottom-origin. All numbers are the last template revision
//! and were tuned against the `0.6 × font_size` width heuristic in `jp-text`.

use crate::model::{OptionCode, PaymentMethod, Product};

/// Vertical distance between the two lines of a split address
pub const LINE_HEIGHT: f64 = 12.0;

/// Y shift applied to the agent block on the いえらぶ form
const IERABU_AGENT_SHIFT: f64 = -40.0;

/// Y distance between the two resident slots
const RESIDENT_SLOT_STRIDE: f64 = 42.0;

/// Number of resident rows the form provides
pub const RESIDENT_SLOTS: usize = 2;

mod size {
    pub const NOTE: f64 = 11.0;
    pub const NORMAL: f64 = 9.0;
    pub const SMALL: f64 = 8.0;
}

/// Where and how a field is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Points from the left edge
    pub x: f64,
    /// Points from the top edge
    pub y: f64,
    /// Font size in points
    pub font_size: f64,
    /// Box width for text fitting; `None` means the value is short by
    /// construction (phone numbers, date tokens, checkmarks)
    pub max_width: Option<f64>,
    /// Whether the box holds two lines (addresses)
    pub two_line: bool,
}

impl Placement {
    const fn at(x: f64, y: f64, font_size: f64) -> Self {
        Self {
            x,
            y,
            font_size,
            max_width: None,
            two_line: false,
        }
    }

    const fn boxed(x: f64, y: f64, font_size: f64, max_width: f64) -> Self {
        Self {
            x,
            y,
            font_size,
            max_width: Some(max_width),
            two_line: false,
        }
    }

    const fn address(x: f64, y: f64, font_size: f64, max_width: f64) -> Self {
        Self {
            x,
            y,
            font_size,
            max_width: Some(max_width),
            two_line: true,
        }
    }

    fn shifted(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Every drawable field on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    ApplicationTypeNew,
    ApplicationTypeRenewal,
    ApplicationYear,
    ApplicationMonth,
    ApplicationDay,
    OptionCheck(OptionCode),
    ApplicantNameKana,
    ApplicantHomePhone,
    ApplicantName,
    ApplicantMobilePhone,
    BirthYear,
    BirthMonth,
    BirthDay,
    GenderMale,
    GenderFemale,
    ResidentNameKana(usize),
    ResidentRelationship(usize),
    ResidentName(usize),
    PropertyAddress,
    PropertyNameKana,
    PropertyRoomNumber,
    PropertyName,
    ServicePeriodYear,
    ServicePeriodMonth,
    ServicePeriodDay,
    RenewalNote,
    GuaranteeNumber,
    ServicePrice,
    EmergencyNameKana,
    EmergencyHomePhone,
    EmergencyName,
    EmergencyMobilePhone,
    EmergencyRelationship,
    EmergencyAddress,
    AgentName,
    AgentCode,
    AgentPhone,
    AgentRepresentative,
}

/// Look up where a field is drawn for the given product and cadence
///
/// `None` means the field does not exist on this product/cadence variant of
/// the form and must not be drawn, whatever its data. Data-dependent
/// visibility (absent values, the senior-watch gate on the emergency block)
/// is the renderer's job; this table only knows the form geometry.
pub fn resolve_placement(
    field: FieldKey,
    product: Product,
    cadence: PaymentMethod,
) -> Option<Placement> {
    use FieldKey::*;

    let standard = product.has_standard_layout();

    match field {
        ApplicationTypeNew => Some(Placement::at(96.0, 118.0, size::NORMAL)),
        ApplicationTypeRenewal => Some(Placement::at(146.0, 118.0, size::NORMAL)),

        ApplicationYear => Some(Placement::at(430.0, 96.0, size::SMALL)),
        ApplicationMonth => Some(Placement::at(470.0, 96.0, size::SMALL)),
        ApplicationDay => Some(Placement::at(500.0, 96.0, size::SMALL)),

        // Option checkboxes only exist on the standard forms
        OptionCheck(option) => {
            if !standard {
                return None;
            }
            let y = match option {
                OptionCode::NeighborTrouble => 112.0,
                OptionCode::SeniorWatch => 127.0,
                OptionCode::ApplianceSupport => 142.0,
            };
            Some(Placement::at(447.0, y, size::NORMAL))
        }

        ApplicantNameKana => Some(Placement::boxed(130.0, 178.0, size::SMALL, 250.0)),
        ApplicantHomePhone => Some(Placement::at(410.0, 178.0, size::SMALL)),
        ApplicantName => Some(Placement::boxed(130.0, 205.0, size::NORMAL, 250.0)),
        ApplicantMobilePhone => Some(Placement::at(410.0, 205.0, size::SMALL)),

        BirthYear => Some(Placement::at(175.0, 235.0, size::SMALL)),
        BirthMonth => Some(Placement::at(225.0, 235.0, size::SMALL)),
        BirthDay => Some(Placement::at(255.0, 235.0, size::SMALL)),

        GenderMale => Some(Placement::at(360.0, 235.0, size::NORMAL)),
        GenderFemale => Some(Placement::at(405.0, 235.0, size::NORMAL)),

        // Two fixed resident rows on the standard forms only
        ResidentNameKana(slot) => resident_slot(standard, slot)
            .map(|dy| Placement::boxed(130.0, 290.0, size::SMALL, 330.0).shifted(dy)),
        ResidentRelationship(slot) => {
            resident_slot(standard, slot).map(|dy| Placement::at(470.0, 290.0, size::SMALL).shifted(dy))
        }
        ResidentName(slot) => resident_slot(standard, slot)
            .map(|dy| Placement::boxed(130.0, 307.0, size::NORMAL, 330.0).shifted(dy)),

        // The いえらぶ form prints the property block higher up the page
        PropertyAddress => Some(if standard {
            Placement::address(130.0, 420.0, size::SMALL, 450.0)
        } else {
            Placement::address(130.0, 300.0, size::SMALL, 450.0)
        }),
        PropertyNameKana => Some(if standard {
            Placement::boxed(130.0, 457.0, size::SMALL, 300.0)
        } else {
            Placement::boxed(130.0, 337.0, size::SMALL, 300.0)
        }),
        PropertyRoomNumber => Some(if standard {
            Placement::at(460.0, 457.0, size::SMALL)
        } else {
            Placement::at(460.0, 337.0, size::SMALL)
        }),
        PropertyName => Some(if standard {
            Placement::boxed(130.0, 482.0, size::NORMAL, 420.0)
        } else {
            Placement::boxed(130.0, 362.0, size::NORMAL, 420.0)
        }),

        ServicePeriodYear | ServicePeriodMonth | ServicePeriodDay => {
            if !standard {
                return None;
            }
            let (xs, font_size) = if cadence.is_yearly() {
                ([180.0, 232.0, 262.0], size::NORMAL)
            } else {
                ([175.0, 225.0, 255.0], size::SMALL)
            };
            let x = match field {
                ServicePeriodYear => xs[0],
                ServicePeriodMonth => xs[1],
                _ => xs[2],
            };
            Some(Placement::at(x, 515.0, font_size))
        }

        RenewalNote => {
            if standard && cadence.is_yearly() {
                Some(Placement::at(140.0, 540.0, size::NOTE))
            } else {
                None
            }
        }

        GuaranteeNumber => Some(if !standard {
            Placement::at(350.0, 390.0, size::SMALL)
        } else if cadence.is_yearly() {
            Placement::at(350.0, 541.0, size::SMALL)
        } else {
            Placement::at(350.0, 533.0, size::SMALL)
        }),

        ServicePrice => {
            if !standard {
                return None;
            }
            if cadence.is_yearly() {
                Some(Placement::at(390.0, 575.0, size::SMALL))
            } else {
                Some(Placement::at(160.0, 575.0, size::SMALL))
            }
        }

        EmergencyNameKana => standard.then(|| Placement::boxed(130.0, 615.0, size::SMALL, 250.0)),
        EmergencyHomePhone => standard.then(|| Placement::at(410.0, 615.0, size::SMALL)),
        EmergencyName => standard.then(|| Placement::boxed(130.0, 635.0, size::NORMAL, 250.0)),
        EmergencyMobilePhone => standard.then(|| Placement::at(410.0, 635.0, size::SMALL)),
        EmergencyRelationship => standard.then(|| Placement::at(470.0, 657.0, size::SMALL)),
        EmergencyAddress => standard.then(|| Placement::address(130.0, 675.0, size::SMALL, 450.0)),

        AgentName => Some(agent_placement(
            Placement::boxed(130.0, 780.0, size::SMALL, 330.0),
            standard,
        )),
        AgentCode => Some(agent_placement(
            Placement::at(410.0, 780.0, size::SMALL),
            standard,
        )),
        AgentPhone => Some(agent_placement(
            Placement::at(130.0, 802.0, size::SMALL),
            standard,
        )),
        AgentRepresentative => Some(agent_placement(
            Placement::at(410.0, 802.0, size::SMALL),
            standard,
        )),
    }
}

/// The highlight rectangle behind the renewal-period note
pub fn renewal_note_box(product: Product, cadence: PaymentMethod) -> Option<(f64, f64, f64, f64)> {
    if product.has_standard_layout() && cadence.is_yearly() {
        Some((135.0, 528.0, 320.0, 22.0))
    } else {
        None
    }
}

fn resident_slot(standard: bool, slot: usize) -> Option<f64> {
    if standard && slot < RESIDENT_SLOTS {
        Some(slot as f64 * RESIDENT_SLOT_STRIDE)
    } else {
        None
    }
}

fn agent_placement(base: Placement, standard: bool) -> Placement {
    if standard {
        base
    } else {
        base.shifted(IERABU_AGENT_SHIFT)
    }
}
