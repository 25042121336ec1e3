/// Meteobridge template catalog
///
/// The template query asks the bridge for a fixed list of bracketed tokens.
/// The bridge answers with the substituted values in the same order,
/// separated by single spaces, so the position of a token in the query is
/// also the offset of its value in the response.

/// Separator between tokens in the query string (an encoded space)
const QUERY_SEPARATOR: &str = "%20";

/// Semantic name of a template field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Dewpoint,
    Windchill,
    TemperatureMax,
    TemperatureMin,
    IndoorTemperature,
    IndoorDewpoint,
    Humidity,
    HumidityMax,
    HumidityMin,
    IndoorHumidity,
    StationPressure,
    SealevelPressure,
    PressureTrend,
    SolarRadiation,
    UvIndex,
    Evapotranspiration,
    WindSpeed,
    WindGust,
    WindDirection,
    WindCardinal,
    RainRate,
    RainDaily,
    Rain24h,
    RainYesterday,
    RainMonthly,
    RainYearly,
    Station,
    StationNumber,
    ConsoleBattery,
    IssBattery,
    ClockTime,
    Epoch,
    LastGoodData,
    LightningStrikes,
    LightningDistance,
}

/// Measurement family a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Temperature,
    Humidity,
    Pressure,
    Wind,
    Precipitation,
    Light,
    Lightning,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub index: usize,
    pub token: &'static str,
    pub field: Field,
    pub family: Family,
}

// Response order. Do not reorder: the decoder depends on these offsets.
static FIELDS: [(Field, &str, Family); 36] = [
    (Field::Temperature, "[th0temp-act]", Family::Temperature),
    (Field::Dewpoint, "[th0dew-act]", Family::Temperature),
    (Field::Windchill, "[wind0chill-act]", Family::Temperature),
    (Field::TemperatureMax, "[th0temp-dmax]", Family::Temperature),
    (Field::TemperatureMin, "[th0temp-dmin]", Family::Temperature),
    (Field::IndoorTemperature, "[thb0temp-act]", Family::Temperature),
    (Field::IndoorDewpoint, "[thb0dew-act]", Family::Temperature),
    (Field::Humidity, "[th0hum-act]", Family::Humidity),
    (Field::HumidityMax, "[th0hum-dmax]", Family::Humidity),
    (Field::HumidityMin, "[th0hum-dmin]", Family::Humidity),
    (Field::IndoorHumidity, "[thb0hum-act]", Family::Humidity),
    (Field::StationPressure, "[thb0press-act]", Family::Pressure),
    (Field::SealevelPressure, "[thb0seapress-act]", Family::Pressure),
    (Field::PressureTrend, "[thb0press-delta3h=barotrend]", Family::Pressure),
    (Field::SolarRadiation, "[sol0rad-act]", Family::Light),
    (Field::UvIndex, "[uv0index-act]", Family::Light),
    (Field::Evapotranspiration, "[sol0evo-daysum]", Family::Light),
    (Field::WindSpeed, "[wind0avgwind-act]", Family::Wind),
    (Field::WindGust, "[wind0wind-max10]", Family::Wind),
    (Field::WindDirection, "[wind0dir-act]", Family::Wind),
    (Field::WindCardinal, "[wind0dir-act=endir]", Family::Wind),
    (Field::RainRate, "[rain0rate-act]", Family::Precipitation),
    (Field::RainDaily, "[rain0total-daysum]", Family::Precipitation),
    (Field::Rain24h, "[rain0total-sum24h]", Family::Precipitation),
    (Field::RainYesterday, "[rain0total-ydmax]", Family::Precipitation),
    (Field::RainMonthly, "[rain0total-monthsum]", Family::Precipitation),
    (Field::RainYearly, "[rain0total-yearsum]", Family::Precipitation),
    (Field::Station, "[mbsystem-station]", Family::System),
    (Field::StationNumber, "[mbsystem-stationnum]", Family::System),
    (Field::ConsoleBattery, "[thb0lowbat-act]", Family::System),
    (Field::IssBattery, "[th0lowbat-act]", Family::System),
    (Field::ClockTime, "[hh][mm][ss]", Family::System),
    (Field::Epoch, "[epoch]", Family::System),
    (Field::LastGoodData, "[mbsystem-lastgooddata]", Family::System),
    (Field::LightningStrikes, "[lgt0total-daysum]", Family::Lightning),
    (Field::LightningDistance, "[lgt0dist-davg]", Family::Lightning),
];

/// Number of fields shared by every catalog version
const BASE_FIELD_COUNT: usize = 34;

/// Which template the bridge is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogVersion {
    Standard,
    /// Standard fields followed by lightning strike count and distance
    #[default]
    WithLightning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateCatalog {
    version: CatalogVersion,
}

impl TemplateCatalog {
    pub fn new(version: CatalogVersion) -> Self {
        TemplateCatalog { version }
    }

    /// Number of values expected in a response
    pub fn len(&self) -> usize {
        match self.version {
            CatalogVersion::Standard => BASE_FIELD_COUNT,
            CatalogVersion::WithLightning => FIELDS.len(),
        }
    }

    pub fn has_lightning(&self) -> bool {
        self.version == CatalogVersion::WithLightning
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldSpec> + '_ {
        FIELDS[..self.len()]
            .iter()
            .enumerate()
            .map(|(index, &(field, token, family))| FieldSpec {
                index,
                token,
                field,
                family,
            })
    }

    /// Template query value, without the `template=` key
    pub fn build_query(&self) -> String {
        self.fields()
            .map(|spec| spec.token)
            .collect::<Vec<_>>()
            .join(QUERY_SEPARATOR)
    }

    pub fn spec(&self, field: Field) -> Option<FieldSpec> {
        self.fields().find(|spec| spec.field == field)
    }

    /// Response offset of `field`, or None when this version doesn't carry it
    pub fn field_index(&self, field: Field) -> Option<usize> {
        self.spec(field).map(|spec| spec.index)
    }

    /// The token sent for `field`
    pub fn token(&self, field: Field) -> Option<&'static str> {
        self.spec(field).map(|spec| spec.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_order_matches_indices() {
        let catalog = TemplateCatalog::new(CatalogVersion::WithLightning);
        let query = catalog.build_query();
        let tokens: Vec<&str> = query.split(QUERY_SEPARATOR).collect();

        assert_eq!(tokens.len(), catalog.len());
        for spec in catalog.fields() {
            assert_eq!(tokens[spec.index], spec.token);
            assert_eq!(catalog.field_index(spec.field), Some(spec.index));
        }
    }

    #[test]
    fn test_query_has_no_trailing_separator() {
        let query = TemplateCatalog::default().build_query();
        assert!(query.starts_with("[th0temp-act]%20[th0dew-act]"));
        assert!(query.ends_with("[lgt0dist-davg]"));
    }

    #[test]
    fn test_standard_catalog_omits_lightning() {
        let catalog = TemplateCatalog::new(CatalogVersion::Standard);
        assert_eq!(catalog.len(), 34);
        assert!(!catalog.has_lightning());
        assert_eq!(catalog.field_index(Field::LightningStrikes), None);
        assert_eq!(catalog.field_index(Field::LastGoodData), Some(33));
        assert!(!catalog.build_query().contains("lgt0"));
    }

    #[test]
    fn test_known_offsets() {
        let catalog = TemplateCatalog::default();
        assert_eq!(catalog.field_index(Field::Temperature), Some(0));
        assert_eq!(catalog.field_index(Field::Humidity), Some(7));
        assert_eq!(catalog.field_index(Field::SolarRadiation), Some(14));
        assert_eq!(catalog.field_index(Field::WindCardinal), Some(20));
        assert_eq!(catalog.field_index(Field::Station), Some(27));
        assert_eq!(catalog.field_index(Field::LightningDistance), Some(35));
        assert_eq!(catalog.token(Field::PressureTrend), Some("[thb0press-delta3h=barotrend]"));
    }
}
