use crate::error::NormalizationError;

/// City, optional region and optional country taken from free-text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl LocationQuery {
    /// Split `raw` on commas and trim each piece.
    ///
    /// The first piece is the city, the second the region and the third the
    /// country; anything after that is dropped. Empty optional pieces count
    /// as absent.
    pub fn parse(raw: &str) -> Result<Self, NormalizationError> {
        let mut parts = raw.split(',').map(str::trim);

        let city = parts.next().unwrap_or_default();
        if city.is_empty() {
            return Err(NormalizationError::EmptyLocation);
        }

        let mut next_part = || parts.next().filter(|p| !p.is_empty()).map(str::to_owned);
        let region = next_part();
        let country = next_part();

        Ok(Self { city: city.to_owned(), region, country })
    }

    /// Value sent as the provider's `q` parameter, e.g. `Austin,Texas,US`.
    pub fn query_string(&self) -> String {
        let mut q = self.city.clone();
        for part in [&self.region, &self.country].into_iter().flatten() {
            q.push(',');
            q.push_str(part);
        }
        q
    }

    /// Label built from the provider's city name plus whatever region and
    /// country the user typed.
    pub fn display_label(&self, provider_name: &str) -> String {
        let mut label = provider_name.to_owned();
        for part in [&self.region, &self.country].into_iter().flatten() {
            label.push_str(", ");
            label.push_str(part);
        }
        label
    }
}

pub fn normalize(raw: &str) -> Result<LocationQuery, NormalizationError> {
    LocationQuery::parse(raw)
}
