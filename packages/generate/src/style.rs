//! Per-category marker styling.

use service_map_service_models::ServiceCategory;

/// Colour and icon used for a category's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Leaflet.awesome-markers colour name (also a valid CSS colour).
    pub color: &'static str,
    /// Font Awesome 4 icon name, without the `fa-` prefix.
    pub icon: &'static str,
}

/// Returns the marker style for `category`.
#[must_use]
pub const fn style_for(category: ServiceCategory) -> MarkerStyle {
    let (color, icon) = match category {
        ServiceCategory::ShelterHousing => ("red", "home"),
        ServiceCategory::FoodServices => ("orange", "cutlery"),
        ServiceCategory::MedicalHealth => ("blue", "plus"),
        ServiceCategory::MentalHealth => ("purple", "heart"),
        ServiceCategory::Employment => ("green", "briefcase"),
        ServiceCategory::BasicNeeds => ("brown", "shower"),
        ServiceCategory::LegalAdvocacy => ("darkblue", "gavel"),
        ServiceCategory::YouthFamily => ("pink", "child"),
        ServiceCategory::Other => ("gray", "info-circle"),
    };
    MarkerStyle { color, icon }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_distinct_style() {
        let styles: Vec<MarkerStyle> = ServiceCategory::all()
            .iter()
            .map(|c| style_for(*c))
            .collect();
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a.color, b.color);
                assert_ne!(a.icon, b.icon);
            }
        }
    }

    #[test]
    fn shelter_is_red_home() {
        assert_eq!(
            style_for(ServiceCategory::ShelterHousing),
            MarkerStyle {
                color: "red",
                icon: "home"
            }
        );
        assert_eq!(style_for(ServiceCategory::Other).icon, "info-circle");
    }
}
