//! # Pipeline Rendering
//!
//! Renders the pieces of the generated GitLab child pipeline:
//!
//! - the **preamble**, written once: stages, the hidden base jobs that hold
//!   the actual `kubectl`/`argocd` scripts, and one rule template per
//!   environment (`dev`, `devdmz`, `prod`, `proddmz`, `procdmz`);
//! - one **job block** per changed resource. Namespace and project blocks
//!   carry five deploy jobs; application blocks carry five deploy jobs and
//!   five jobs registering the chart repository with Argo CD.
//!
//! The templates live in `src/templates/` and are compiled into the binary.
//! Besides the resource identifiers they receive the configured directory
//! prefixes and manifest extension, so the generated `kubectl apply` paths
//! and `only: changes` globs follow the configuration.

use crate::classify::Resource;
use crate::config::Config;
use crate::error::Result;
use crate::template::{Context, Template};

const PREAMBLE_TEMPLATE: &str = include_str!("templates/preamble.yml");
const NAMESPACE_TEMPLATE: &str = include_str!("templates/namespace.yml");
const PROJECT_TEMPLATE: &str = include_str!("templates/project.yml");
const APPLICATION_TEMPLATE: &str = include_str!("templates/application.yml");

/// Renders the preamble and per-resource job blocks.
#[derive(Debug, Clone)]
pub struct PipelineRenderer {
    preamble: Template,
    namespace: Template,
    project: Template,
    application: Template,
    base: Context,
}

impl PipelineRenderer {
    pub fn new(config: &Config) -> Result<Self> {
        let dirs = &config.directories;
        let base = Context::new()
            .with("namespace_dir", dirs.namespace.as_str())
            .with("project_dir", dirs.project.as_str())
            .with("application_dir", dirs.application.as_str())
            .with("manifest_extension", config.manifest_extension());

        Ok(Self {
            preamble: Template::parse(PREAMBLE_TEMPLATE)?,
            namespace: Template::parse(NAMESPACE_TEMPLATE)?,
            project: Template::parse(PROJECT_TEMPLATE)?,
            application: Template::parse(APPLICATION_TEMPLATE)?,
            base,
        })
    }

    /// The fixed block written once at the top of the pipeline.
    pub fn preamble(&self) -> Result<String> {
        self.preamble.render(&self.base)
    }

    /// The job block for a classified resource.
    pub fn render(&self, resource: &Resource) -> Result<String> {
        match resource {
            Resource::Namespace { name } => self.namespace_jobs(name),
            Resource::Project { name } => self.project_jobs(name),
            Resource::Application {
                project,
                application,
            } => self.application_jobs(project, application),
        }
    }

    pub fn namespace_jobs(&self, namespace: &str) -> Result<String> {
        let context = self.base.clone().with("namespace", namespace);
        self.namespace.render(&context)
    }

    pub fn project_jobs(&self, project: &str) -> Result<String> {
        let context = self.base.clone().with("project", project);
        self.project.render(&context)
    }

    pub fn application_jobs(&self, project: &str, application: &str) -> Result<String> {
        let context = self
            .base
            .clone()
            .with("project", project)
            .with("application", application);
        self.application.render(&context)
    }
}

/// Top-level keys (job and hidden template names) of a rendered block.
///
/// Every key in the generated document must be unique, so the driver uses
/// these to spot blocks that would redefine an earlier job.
pub fn job_names(block: &str) -> Vec<&str> {
    block
        .lines()
        .filter(|line| !line.starts_with(&[' ', '#'][..]) && line.ends_with(':'))
        .map(|line| line.trim_end_matches(':'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn renderer() -> PipelineRenderer {
        PipelineRenderer::new(&Config::default()).unwrap()
    }

    const ENVIRONMENTS: [&str; 5] = ["dev", "devdmz", "prod", "proddmz", "procdmz"];

    #[test]
    fn test_builtin_templates_parse() {
        let renderer = renderer();
        assert!(renderer.preamble().is_ok());
    }

    #[test]
    fn test_preamble_has_stages_and_environment_rules() {
        let preamble = renderer().preamble().unwrap();
        assert!(preamble.contains("stages:"));
        for env in ENVIRONMENTS {
            assert!(preamble.contains(&format!(".{env}-change:")), "{env}");
        }
        assert!(preamble.contains("kubectl apply -f manifests/k8s-namespace-setup/${NAMESPACE}.yml"));
        assert!(preamble.contains("kubectl apply -f \"manifests/argocd-proj-workflow/$PROJECT.yml\""));
        assert!(preamble.contains("kubectl apply -f \"manifests/argocd-app-workflow/$PROJECT/\" --recursive"));
        assert!(!preamble.contains("{{"));
    }

    #[test]
    fn test_namespace_block() {
        let block = renderer().namespace_jobs("payments").unwrap();
        assert_eq!(
            job_names(&block),
            vec![
                ".payments-namespace-change",
                "dev-deploy-payments",
                "prod-deploy-payments",
                "devdmz-deploy-payments",
                "proddmz-deploy-payments",
                "procdmz-deploy-payments",
            ]
        );
        assert!(block.contains("NAMESPACE: \"payments\""));
        assert!(block.contains("\"manifests/k8s-namespace-setup/**payments**\""));
        assert!(block.starts_with('\n'));
    }

    #[test]
    fn test_project_block() {
        let block = renderer().project_jobs("teamA").unwrap();
        let names = job_names(&block);
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], ".teamA-argocd-proj-change");
        for env in ENVIRONMENTS {
            assert!(names.contains(&format!("{env}-deploy-teamA").as_str()), "{env}");
        }
        assert_eq!(block.matches("- .deploy-argo-app-project").count(), 5);
        assert!(block.contains("\"manifests/argocd-proj-workflow/teamA**\""));
    }

    #[test]
    fn test_application_block_has_deploy_and_registration_jobs() {
        let block = renderer().application_jobs("teamA", "serviceX").unwrap();
        let names = job_names(&block);
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], ".serviceX-teamA-argocd-app-change");

        let deploys: Vec<_> = names.iter().filter(|n| n.contains("-deploy-")).collect();
        let registrations: Vec<_> = names
            .iter()
            .filter(|n| n.contains("-argocd-add-repository-"))
            .collect();
        assert_eq!(deploys.len(), 5);
        assert_eq!(registrations.len(), 5);
        for name in deploys.iter().chain(registrations.iter()) {
            assert!(name.ends_with("-serviceX-teamA"), "{name}");
        }

        assert!(block.contains("PROJECT: \"teamA\""));
        assert!(block.contains("APPLICATION: \"serviceX\""));
        assert!(block.contains("URL: $CI_PROCDMZ_ARGOCD_SERVER"));
        assert_eq!(block.matches("resource_group: development").count(), 2);
        assert_eq!(block.matches("resource_group: production").count(), 3);
    }

    #[test]
    fn test_preamble_job_names_skip_nested_keys() {
        let preamble = renderer().preamble().unwrap();
        let names = job_names(&preamble);
        assert!(names.contains(&"stages"));
        assert!(names.contains(&".deploy-template"));
        assert!(names.contains(&".procdmz-change"));
        assert!(names.iter().all(|name| !name.starts_with(' ')));
    }

    #[test]
    fn test_namespace_and_project_blocks_share_deploy_jobs() {
        let renderer = renderer();
        let namespace = renderer.namespace_jobs("payments").unwrap();
        let project = renderer.project_jobs("payments").unwrap();
        let shared: Vec<_> = job_names(&namespace)
            .into_iter()
            .filter(|name| job_names(&project).contains(name))
            .collect();
        assert_eq!(shared.len(), 5);
        assert!(shared.contains(&"dev-deploy-payments"));
    }

    #[test]
    fn test_render_dispatches_on_resource() {
        let renderer = renderer();
        let resource = Resource::Project {
            name: "infra".to_string(),
        };
        assert_eq!(
            renderer.render(&resource).unwrap(),
            renderer.project_jobs("infra").unwrap()
        );
    }

    #[test]
    fn test_render_rejects_unsafe_identifier() {
        let err = renderer().namespace_jobs("bad name").unwrap_err();
        assert!(err.to_string().contains("(variable: namespace)"));
    }

    #[test]
    fn test_configured_directories_flow_into_templates() {
        let config = config::parse(
            r#"
manifest_suffix: .yaml
directories:
  namespace: deploy/ns
  project: deploy/projects
  application: deploy/apps
"#,
        )
        .unwrap();
        let renderer = PipelineRenderer::new(&config).unwrap();

        let preamble = renderer.preamble().unwrap();
        assert!(preamble.contains("kubectl apply -f deploy/ns/${NAMESPACE}.yaml"));
        assert!(preamble.contains("\"deploy/projects/$PROJECT.yaml\""));
        assert!(preamble.contains("\"deploy/apps/$PROJECT/\""));

        let block = renderer.application_jobs("teamA", "api").unwrap();
        assert!(block.contains("\"deploy/apps/teamA/api**\""));
    }
}
