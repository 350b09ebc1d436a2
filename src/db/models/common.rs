//! Common types and utilities shared across models.

use chrono::{SecondsFormat, Utc};

/// Current time as a fixed-width RFC 3339 UTC string.
///
/// Microsecond precision keeps lexical order equal to time order, which the
/// "latest record wins" queries rely on.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Declares a string-backed choice field: stored and serialized as its key,
/// displayed with its label.
macro_rules! choices {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => ($key:literal, $label:literal) ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( #[serde(rename = $key)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            pub fn keys() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $key => Ok($name::$variant), )+
                    _ => Err(format!("\"{}\" is not a valid choice.", s)),
                }
            }
        }
    };
}

choices! {
    /// Kinds of service offered
    ServiceType {
        Susu => ("susu", "Susu Collection"),
        Savings => ("savings", "Savings Plans"),
        Advisory => ("advisory", "Financial Advisory"),
        Loans => ("loans", "Loan Services"),
        Group => ("group", "Group Susu"),
        Digital => ("digital", "Digital Services"),
    }
}

choices! {
    /// Site pages a PageImage can be attached to
    SitePage {
        Home => ("home", "Home Page"),
        About => ("about", "About Page"),
        Services => ("services", "Services Page"),
        Contact => ("contact", "Contact Page"),
    }
}

choices! {
    BlogCategory {
        FinancialTips => ("Financial Tips", "Financial Tips"),
        CompanyNews => ("Company News", "Company News"),
        SavingsGuide => ("Savings Guide", "Savings Guide"),
        Investment => ("Investment", "Investment"),
        Community => ("Community", "Community"),
    }
}

choices! {
    UpdateType {
        Announcement => ("announcement", "Announcement"),
        Alert => ("alert", "Alert"),
        News => ("news", "News"),
        Event => ("event", "Event"),
    }
}

choices! {
    Priority {
        High => ("high", "High"),
        Medium => ("medium", "Medium"),
        Low => ("low", "Low"),
    }
}

choices! {
    MediaType {
        Image => ("image", "Image"),
        Video => ("video", "Video"),
    }
}

choices! {
    EventType {
        Meeting => ("meeting", "Meeting"),
        Celebration => ("celebration", "Celebration"),
        Workshop => ("workshop", "Workshop"),
        Community => ("community", "Community Event"),
        Award => ("award", "Award Ceremony"),
        Other => ("other", "Other"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_roundtrip() {
        assert_eq!("susu".parse::<ServiceType>(), Ok(ServiceType::Susu));
        assert_eq!(ServiceType::Group.label(), "Group Susu");
        assert_eq!(
            "Savings Guide".parse::<BlogCategory>(),
            Ok(BlogCategory::SavingsGuide)
        );
        assert_eq!(EventType::Award.to_string(), "award");
    }

    #[test]
    fn test_choice_rejects_unknown() {
        let err = "crypto".parse::<ServiceType>().unwrap_err();
        assert_eq!(err, "\"crypto\" is not a valid choice.");
        // keys are case sensitive
        assert!("Home".parse::<SitePage>().is_err());
    }

    #[test]
    fn test_choice_serde_uses_key() {
        let json = serde_json::to_string(&BlogCategory::FinancialTips).unwrap();
        assert_eq!(json, "\"Financial Tips\"");
        let parsed: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let a = now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }
}
