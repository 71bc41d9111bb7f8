//! Property-based tests for classification and rendering.
//!
//! These tests use proptest to generate manifest paths and identifiers and
//! check that the invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::classify::{Classification, Classifier, MalformedReason, Resource};
    use crate::config::Config;
    use crate::pipeline::PipelineRenderer;
    use crate::template::{is_safe_value, Context, Template};
    use proptest::prelude::*;

    const IDENT: &str = "[A-Za-z0-9_][A-Za-z0-9_.-]{0,20}";

    fn classifier() -> Classifier {
        Classifier::new(&Config::default())
    }

    // ============================================================================
    // Classification properties
    // ============================================================================

    proptest! {
        /// Property: any safe name under the namespace directory is a namespace
        #[test]
        fn namespace_files_yield_their_stem(name in IDENT) {
            let path = format!("manifests/k8s-namespace-setup/{name}.yml");
            prop_assert_eq!(
                classifier().classify(&path),
                Classification::Matched(Resource::Namespace { name })
            );
        }

        /// Property: project files are routed to the project category
        #[test]
        fn project_files_yield_their_stem(name in IDENT) {
            let path = format!("manifests/argocd-proj-workflow/{name}.yml");
            prop_assert_eq!(
                classifier().classify(&path),
                Classification::Matched(Resource::Project { name })
            );
        }

        /// Property: application files yield (folder, stem)
        #[test]
        fn application_files_yield_folder_and_stem(project in IDENT, application in IDENT) {
            let path = format!("manifests/argocd-app-workflow/{project}/{application}.yml");
            prop_assert_eq!(
                classifier().classify(&path),
                Classification::Matched(Resource::Application { project, application })
            );
        }

        /// Property: application files without a folder are always malformed
        #[test]
        fn application_files_need_a_folder(application in IDENT) {
            let path = format!("manifests/argocd-app-workflow/{application}.yml");
            prop_assert_eq!(
                classifier().classify(&path),
                Classification::Malformed(MalformedReason::MissingSubfolder)
            );
        }

        /// Property: paths outside `manifests/` never match
        #[test]
        fn paths_outside_manifests_are_unmatched(path in "[a-z]{1,8}(/[a-z0-9._-]{1,8}){0,4}") {
            prop_assume!(!path.starts_with("manifests"));
            prop_assert_eq!(classifier().classify(&path), Classification::Unmatched);
        }

        /// Property: classification never panics, whatever the input
        #[test]
        fn classify_never_panics(path in ".*") {
            let _ = classifier().classify(&path);
        }

        /// Property: every matched identifier is safe to substitute
        #[test]
        fn matched_identifiers_are_safe(path in "manifests/(k8s-namespace-setup|argocd-proj-workflow|argocd-app-workflow)/.{0,30}") {
            if let Classification::Matched(resource) = classifier().classify(&path) {
                for identifier in resource.identifiers() {
                    prop_assert!(is_safe_value(identifier), "{:?} from {:?}", identifier, path);
                }
            }
        }
    }

    // ============================================================================
    // Rendering properties
    // ============================================================================

    proptest! {
        /// Property: a matched resource always renders, and names itself in every job
        #[test]
        fn matched_resources_render(project in IDENT, application in IDENT) {
            let renderer = PipelineRenderer::new(&Config::default()).unwrap();
            let block = renderer.application_jobs(&project, &application).unwrap();
            let suffix = format!("-{application}-{project}:");
            let jobs = block.lines().filter(|line| line.ends_with(&suffix)).count();
            prop_assert_eq!(jobs, 10);
        }

        /// Property: rendering refuses values outside the safe set
        #[test]
        fn unsafe_values_are_refused(value in ".*[ :#\"'{}\\n].*") {
            let template = Template::parse("{{value}}").unwrap();
            prop_assert!(template.render(&Context::new().with("value", value)).is_err());
        }

        /// Property: rendering is deterministic
        #[test]
        fn rendering_is_deterministic(name in IDENT) {
            let renderer = PipelineRenderer::new(&Config::default()).unwrap();
            prop_assert_eq!(
                renderer.namespace_jobs(&name).unwrap(),
                renderer.namespace_jobs(&name).unwrap()
            );
        }
    }
}
