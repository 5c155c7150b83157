//! Integration tests for types

#[cfg(test)]
mod tests {
    use autorecipe_types::*;
    use proptest::prelude::*;

    fn requirement_strategy() -> impl Strategy<Value = Requirement> {
        prop_oneof![
            "[a-d]{1,2}".prop_map(Requirement::Plain),
            ("py[<>]=?3[0-9]{1,2}", "[a-d]{1,2}")
                .prop_map(|(cond, dep)| Requirement::conditional(cond, dep)),
        ]
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(input in prop::collection::vec(requirement_strategy(), 0..24)) {
            let once = dedupe(input.clone());
            let twice = dedupe(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn dedupe_keeps_every_conditional(input in prop::collection::vec(requirement_strategy(), 0..24)) {
            let before = input.iter().filter(|r| r.is_conditional()).count();
            let after = dedupe(input).iter().filter(|r| r.is_conditional()).count();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn dedupe_leaves_unique_plain_entries(input in prop::collection::vec(requirement_strategy(), 0..24)) {
            let out = dedupe(input);
            let plain: Vec<&str> = out.iter().filter_map(Requirement::as_plain).collect();
            let mut sorted = plain.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(plain.len(), sorted.len());
        }
    }

    #[test]
    fn test_document_section_order_and_optional_sections() {
        let mut context = Context::new();
        context.insert_detected("name", "demo");
        context.insert_detected("version", "0.1.0");

        let doc = RecipeDocument {
            context,
            package: PackageSection::templated(),
            source: SourceSpec::Path {
                path: "..".to_string(),
            },
            build: BuildSection {
                script: Script::from("$PYTHON -m pip install . -vv --no-build-isolation"),
                number: 0,
                entry_points: vec![],
                skip: vec![],
                extra: indexmap::IndexMap::new(),
            },
            requirements: RequirementsSection {
                run: vec![Requirement::plain("python")],
                ..RequirementsSection::default()
            },
            test: None,
            about: AboutSection {
                summary: Some("Demo package".to_string()),
                ..AboutSection::default()
            },
            extra: None,
        };

        let yaml = serde_yml::to_string(&doc).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|line| !line.starts_with(' ') && !line.starts_with('-') && line.ends_with(':'))
            .map(|line| line.trim_end_matches(':'))
            .collect();
        assert_eq!(
            keys,
            vec!["context", "package", "source", "build", "requirements", "about"]
        );
        assert!(!yaml.contains("test:"));
        assert!(!yaml.contains("extra:"));
    }

    #[test]
    fn test_license_file_accepts_string_or_list() {
        let single: LicenseFile = toml::Value::String("LICENSE".into()).try_into().unwrap();
        assert_eq!(single, LicenseFile::Single("LICENSE".into()));

        let many: LicenseFile = toml::Value::Array(vec!["A".into(), "B".into()])
            .try_into()
            .unwrap();
        assert_eq!(
            many,
            LicenseFile::Multiple(vec!["A".to_string(), "B".to_string()])
        );
    }
}
