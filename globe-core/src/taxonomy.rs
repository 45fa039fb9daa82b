//! WMO weather code vocabulary used by Open-Meteo.
//!
//! Two independent views of a code live here:
//! - [`classify`] picks a coarse category that drives the background ambience.
//! - [`describe`] picks the text and icon shown on the weather card.
//!
//! They do not share boundaries. Codes 63 and 65 classify as rain but show
//! the heavy-showers icon, while 56/57/66/67 classify as rain and have no
//! card entry at all.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::{Deserialize, Serialize};

/// Coarse condition used for ambience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Clear,
    Rain,
    Snow,
    Storm,
    Cloudy,
}

impl WeatherCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "clear",
            WeatherCategory::Rain => "rain",
            WeatherCategory::Snow => "snow",
            WeatherCategory::Storm => "storm",
            WeatherCategory::Cloudy => "cloudy",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon key rendered on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Sun,
    CloudSun,
    Cloud,
    CloudRain,
    CloudShowersHeavy,
    Snowflake,
    Bolt,
    Smog,
    Question,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::CloudSun => "cloud-sun",
            Icon::Cloud => "cloud",
            Icon::CloudRain => "cloud-rain",
            Icon::CloudShowersHeavy => "cloud-showers-heavy",
            Icon::Snowflake => "snowflake",
            Icon::Bolt => "bolt",
            Icon::Smog => "smog",
            Icon::Question => "question",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Description {
    pub description: &'static str,
    pub icon: Icon,
}

const UNKNOWN: Description = Description {
    description: "Unknown",
    icon: Icon::Question,
};

/// Codes that have a card entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WmoCode {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    ModerateDrizzle,
    DenseDrizzle,
    SlightRain,
    ModerateRain,
    HeavyRain,
    SlightSnow,
    ModerateSnow,
    HeavySnow,
    SnowGrains,
    SlightRainShowers,
    ModerateRainShowers,
    ViolentRainShowers,
    SlightSnowShowers,
    HeavySnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    ThunderstormWithHeavyHail,
}

impl WmoCode {
    pub fn from_code(code: i32) -> Option<Self> {
        let known = match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::RimeFog,
            51 => Self::LightDrizzle,
            53 => Self::ModerateDrizzle,
            55 => Self::DenseDrizzle,
            61 => Self::SlightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            71 => Self::SlightSnow,
            73 => Self::ModerateSnow,
            75 => Self::HeavySnow,
            77 => Self::SnowGrains,
            80 => Self::SlightRainShowers,
            81 => Self::ModerateRainShowers,
            82 => Self::ViolentRainShowers,
            85 => Self::SlightSnowShowers,
            86 => Self::HeavySnowShowers,
            95 => Self::Thunderstorm,
            96 => Self::ThunderstormWithHail,
            99 => Self::ThunderstormWithHeavyHail,
            _ => return None,
        };
        Some(known)
    }

    pub fn describe(self) -> Description {
        let (description, icon) = match self {
            Self::ClearSky => ("Clear sky", Icon::Sun),
            Self::MainlyClear => ("Mainly clear", Icon::Sun),
            Self::PartlyCloudy => ("Partly cloudy", Icon::CloudSun),
            Self::Overcast => ("Overcast", Icon::Cloud),
            Self::Fog => ("Foggy", Icon::Smog),
            Self::RimeFog => ("Depositing rime fog", Icon::Smog),
            Self::LightDrizzle => ("Light drizzle", Icon::CloudRain),
            Self::ModerateDrizzle => ("Moderate drizzle", Icon::CloudRain),
            Self::DenseDrizzle => ("Dense drizzle", Icon::CloudRain),
            Self::SlightRain => ("Slight rain", Icon::CloudRain),
            Self::ModerateRain => ("Moderate rain", Icon::CloudShowersHeavy),
            Self::HeavyRain => ("Heavy rain", Icon::CloudShowersHeavy),
            Self::SlightSnow => ("Slight snow", Icon::Snowflake),
            Self::ModerateSnow => ("Moderate snow", Icon::Snowflake),
            Self::HeavySnow => ("Heavy snow", Icon::Snowflake),
            Self::SnowGrains => ("Snow grains", Icon::Snowflake),
            Self::SlightRainShowers => ("Slight rain showers", Icon::CloudRain),
            Self::ModerateRainShowers => ("Moderate rain showers", Icon::CloudShowersHeavy),
            Self::ViolentRainShowers => ("Violent rain showers", Icon::CloudShowersHeavy),
            Self::SlightSnowShowers => ("Slight snow showers", Icon::Snowflake),
            Self::HeavySnowShowers => ("Heavy snow showers", Icon::Snowflake),
            Self::Thunderstorm => ("Thunderstorm", Icon::Bolt),
            Self::ThunderstormWithHail => ("Thunderstorm with hail", Icon::Bolt),
            Self::ThunderstormWithHeavyHail => ("Thunderstorm with heavy hail", Icon::Bolt),
        };
        Description { description, icon }
    }
}

/// Total over all integers; anything not listed is cloudy.
pub fn classify(code: i32) -> WeatherCategory {
    match code {
        0 | 1 => WeatherCategory::Clear,
        51..=67 | 80..=82 => WeatherCategory::Rain,
        71..=77 | 85..=86 => WeatherCategory::Snow,
        95.. => WeatherCategory::Storm,
        _ => WeatherCategory::Cloudy,
    }
}

/// Card text and icon; unlisted codes describe as "Unknown" with the question icon.
pub fn describe(code: i32) -> Description {
    WmoCode::from_code(code).map_or(UNKNOWN, WmoCode::describe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_clear() {
        assert_eq!(classify(0), WeatherCategory::Clear);
        assert_eq!(classify(1), WeatherCategory::Clear);
    }

    #[test]
    fn classify_rain_ranges_are_inclusive() {
        for code in (51..=67).chain(80..=82) {
            assert_eq!(classify(code), WeatherCategory::Rain, "code {code}");
        }
        assert_eq!(classify(50), WeatherCategory::Cloudy);
        assert_eq!(classify(68), WeatherCategory::Cloudy);
        assert_eq!(classify(83), WeatherCategory::Cloudy);
    }

    #[test]
    fn classify_snow_ranges_are_inclusive() {
        for code in (71..=77).chain(85..=86) {
            assert_eq!(classify(code), WeatherCategory::Snow, "code {code}");
        }
        assert_eq!(classify(78), WeatherCategory::Cloudy);
        assert_eq!(classify(84), WeatherCategory::Cloudy);
        assert_eq!(classify(87), WeatherCategory::Cloudy);
    }

    #[test]
    fn classify_storm_is_open_ended() {
        assert_eq!(classify(94), WeatherCategory::Cloudy);
        assert_eq!(classify(95), WeatherCategory::Storm);
        assert_eq!(classify(99), WeatherCategory::Storm);
        assert_eq!(classify(i32::MAX), WeatherCategory::Storm);
    }

    #[test]
    fn classify_defaults_to_cloudy() {
        for code in [2, 3, 45, 48, -1, i32::MIN] {
            assert_eq!(classify(code), WeatherCategory::Cloudy, "code {code}");
        }
    }

    #[test]
    fn describe_known_codes() {
        assert_eq!(describe(0).description, "Clear sky");
        assert_eq!(describe(2).icon, Icon::CloudSun);
        assert_eq!(describe(45).icon, Icon::Smog);
        assert_eq!(describe(61).icon, Icon::CloudRain);
        assert_eq!(describe(86).description, "Heavy snow showers");
        assert_eq!(describe(99).icon, Icon::Bolt);
    }

    #[test]
    fn rain_category_can_show_heavy_showers_icon() {
        for code in [63, 65] {
            assert_eq!(classify(code), WeatherCategory::Rain);
            assert_eq!(describe(code).icon, Icon::CloudShowersHeavy);
        }
    }

    #[test]
    fn describe_unknown_codes() {
        for code in [4, 56, 67, 100, -5] {
            assert_eq!(describe(code), UNKNOWN, "code {code}");
        }
    }

    #[test]
    fn icon_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Icon::CloudShowersHeavy).unwrap();
        assert_eq!(json, "\"cloud-showers-heavy\"");
        assert_eq!(Icon::CloudShowersHeavy.as_str(), "cloud-showers-heavy");
    }
}
