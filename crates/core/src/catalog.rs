//! Closed tag catalogs.
//!
//! Every answer the questionnaire accepts and every department a facility can offer is drawn from
//! one of the enums below. Each variant carries a fixed wire tag; parsing anything else is an
//! error rather than a silent no-op.

use crate::error::UnknownTag;

macro_rules! tag_catalog {
    (
        $(#[$meta:meta])*
        $name:ident, $catalog:literal {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $tag)] $variant,)+
        }

        impl $name {
            /// Every variant, in catalog order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Catalog name used in error messages.
            pub const CATALOG: &'static str = $catalog;

            /// The wire tag for this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(UnknownTag {
                        catalog: $catalog,
                        tag: s.to_string(),
                    }),
                }
            }
        }
    };
}

tag_catalog! {
    /// Body area the user is concerned about.
    Location, "location" {
        Throat => "throat",
        Chest => "chest",
        Abdomen => "abdomen",
        Leg => "leg",
        Arm => "arm",
        Head => "head",
        Face => "face",
        Back => "back",
        LowerBack => "lower back",
        Other => "other",
    }
}

tag_catalog! {
    /// When the problem started.
    Duration, "duration" {
        Today => "today",
        TwoToThreeDays => "2-3 days ago",
        OneWeek => "1 week ago",
        TwoWeeks => "2 weeks ago",
        OverOneMonth => "over 1 month ago",
    }
}

tag_catalog! {
    /// Character of the problem.
    Symptom, "symptom" {
        Pain => "pain",
        LumpSwelling => "lump/swelling",
        Itchy => "itchy",
        RedSwollen => "red/swollen",
        Fever => "fever",
        Cough => "cough",
        ShortOfBreath => "short of breath",
        Dizziness => "dizziness",
        Other => "other",
    }
}

tag_catalog! {
    /// Approximate lump size, asked only when a lump or swelling is reported.
    LumpSize, "lump size" {
        Small => "small (up to 1cm)",
        Medium => "1-3cm",
        Large => "3cm or larger",
    }
}

tag_catalog! {
    /// Pre-existing condition. `None` is exclusive with every other tag.
    Condition, "condition" {
        None => "none",
        BloodPressureHeart => "blood pressure/heart",
        Diabetes => "diabetes",
        Kidney => "kidney",
        Liver => "liver",
        Cancer => "cancer",
        Allergy => "allergy",
        Other => "other",
    }
}

tag_catalog! {
    /// Whether the user currently takes medicine.
    Medicine, "medicine" {
        Taking => "taking",
        NotTaking => "not taking",
    }
}

tag_catalog! {
    /// Medical specialty offered by a facility.
    Department, "department" {
        InternalMedicine => "internal medicine",
        Ent => "ENT",
        Cardiology => "cardiology",
        RespiratoryMedicine => "respiratory medicine",
        Gastroenterology => "gastroenterology",
        Surgery => "surgery",
        Orthopedics => "orthopedics",
        Neurosurgery => "neurosurgery",
        Neurology => "neurology",
        Dermatology => "dermatology",
        Pediatrics => "pediatrics",
        Ophthalmology => "ophthalmology",
        Urology => "urology",
        Gynecology => "gynecology",
        Psychiatry => "psychiatry",
        Dentistry => "dentistry",
        Rehabilitation => "rehabilitation",
    }
}

/// Parse a list of wire tags, failing on the first unknown one.
pub fn parse_tags<T>(tags: &[String]) -> Result<Vec<T>, UnknownTag>
where
    T: std::str::FromStr<Err = UnknownTag>,
{
    tags.iter().map(|t| t.trim().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for department in Department::ALL {
            let parsed: Department = department.as_str().parse().expect("known tag");
            assert_eq!(parsed, *department);
        }
        for symptom in Symptom::ALL {
            let parsed: Symptom = symptom.as_str().parse().expect("known tag");
            assert_eq!(parsed, *symptom);
        }
    }

    #[test]
    fn unknown_tag_names_its_catalog() {
        let err = "elbow".parse::<Location>().expect_err("not in catalog");
        assert_eq!(err.catalog, "location");
        assert_eq!(err.tag, "elbow");
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&Symptom::ShortOfBreath).expect("serialize");
        assert_eq!(json, "\"short of breath\"");
        let parsed: Department = serde_json::from_str("\"ENT\"").expect("deserialize");
        assert_eq!(parsed, Department::Ent);
        assert!(serde_json::from_str::<Department>("\"ent\"").is_err());
    }

    #[test]
    fn parse_tags_trims_and_rejects_unknown() {
        let parsed: Vec<Department> =
            parse_tags(&[" dermatology".to_string(), "ENT ".to_string()]).expect("known tags");
        assert_eq!(parsed, vec![Department::Dermatology, Department::Ent]);

        let err = parse_tags::<Department>(&["podiatry".to_string()]).expect_err("unknown");
        assert_eq!(err.tag, "podiatry");
    }
}
