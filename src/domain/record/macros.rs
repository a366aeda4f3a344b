//! Declaration macro for record entities.
//!
//! **`schema_entity!`** declares an entity struct and its registry metadata in
//! one place, so the field set, descriptions and examples cannot drift apart.
//!
//! # Usage
//!
//! ```ignore
//! schema_entity! {
//!     /// Details about the client's employer.
//!     pub struct EmployerInfo {
//!         description: "The client's employer",
//!         fields: {
//!             company_name: String => "Employer name", ["Acme Inc."],
//!             phone: String => "Employer phone number", ["(555) 123-4567"],
//!         },
//!         sections: {},
//!     }
//! }
//! ```
//!
//! Leaves become `FieldValue<T>` (unset until provided); sections are nested
//! entities that were themselves declared with this macro.

/// Declares a record entity and implements `SchemaEntity` for it.
#[macro_export]
macro_rules! schema_entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            description: $desc:literal,
            fields: {
                $(
                    $field:ident : $fty:ty => $fdesc:literal, [ $($example:tt),* $(,)? ]
                ),* $(,)?
            },
            sections: {
                $(
                    $section:ident : $sty:ty => $sdesc:literal
                ),* $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[doc = $fdesc]
                pub $field: $crate::domain::record::FieldValue<$fty>,
            )*
            $(
                #[doc = $sdesc]
                pub $section: $sty,
            )*
        }

        impl $crate::domain::record::SchemaEntity for $name {
            const NAME: &'static str = stringify!($name);

            fn describe() -> $crate::domain::record::EntitySchema {
                #[allow(unused_mut)]
                let mut properties = ::std::collections::BTreeMap::new();
                $(
                    properties.insert(
                        stringify!($field).to_string(),
                        $crate::domain::record::SchemaNode::Field($crate::domain::record::FieldSchema {
                            semantic_type: <$fty as $crate::domain::record::FieldType>::semantic_type(),
                            description: $fdesc.to_string(),
                            examples: vec![$(::serde_json::json!($example)),*],
                        }),
                    );
                )*
                $(
                    properties.insert(
                        stringify!($section).to_string(),
                        $crate::domain::record::SchemaNode::Section($crate::domain::record::EntitySchema {
                            description: $sdesc.to_string(),
                            properties: <$sty as $crate::domain::record::SchemaEntity>::describe().properties,
                        }),
                    );
                )*
                $crate::domain::record::EntitySchema {
                    description: $desc.to_string(),
                    properties,
                }
            }

            #[allow(unused_variables)]
            fn collect_missing(
                &self,
                prefix: &$crate::domain::record::FieldPath,
                out: &mut ::std::collections::BTreeSet<$crate::domain::record::FieldPath>,
            ) {
                $(
                    if self.$field.is_unset() {
                        out.insert(prefix.child(stringify!($field)));
                    }
                )*
                $(
                    $crate::domain::record::SchemaEntity::collect_missing(
                        &self.$section,
                        &prefix.child(stringify!($section)),
                        out,
                    );
                )*
            }
        }
    };
}
