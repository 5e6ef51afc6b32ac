//! Hosting platforms and dependency managers known to the bot.
//!
//! Each manager carries the file patterns it scans when the configuration
//! does not override them.

identifier_enum! {
    /// Hosting service the bot talks to.
    pub enum Platform: "platform" {
        Github => "github",
        Gitlab => "gitlab",
        Bitbucket => "bitbucket",
        BitbucketServer => "bitbucket-server",
        Azure => "azure",
        Gitea => "gitea",
        Forgejo => "forgejo",
        Gerrit => "gerrit",
        Codecommit => "codecommit",
        Local => "local",
    }
}

identifier_enum! {
    /// Ecosystem scanner responsible for one kind of dependency file.
    pub enum Manager: "manager" {
        PipRequirements => "pip_requirements",
        Pipenv => "pipenv",
        Poetry => "poetry",
        Pep621 => "pep621",
        SetupCfg => "setup-cfg",
        Dockerfile => "dockerfile",
        DockerCompose => "docker-compose",
        GithubActions => "github-actions",
        Gitlabci => "gitlabci",
        Npm => "npm",
        Cargo => "cargo",
        Gomod => "gomod",
        Maven => "maven",
        Gradle => "gradle",
        Nuget => "nuget",
        Composer => "composer",
        Bundler => "bundler",
        HelmValues => "helm-values",
        Terraform => "terraform",
        PreCommit => "pre-commit",
    }
}

impl Manager {
    /// Built-in `managerFilePatterns` used when no override block sets them.
    pub fn default_patterns(self) -> &'static [&'static str] {
        match self {
            Manager::PipRequirements => &[r"(^|/)[\w-]*requirements([-.]\w+)?\.(txt|pip)$"],
            Manager::Pipenv => &[r"(^|/)Pipfile$"],
            Manager::Poetry | Manager::Pep621 => &[r"(^|/)pyproject\.toml$"],
            Manager::SetupCfg => &[r"(^|/)setup\.cfg$"],
            Manager::Dockerfile => &[
                r"(^|/|\.)([Dd]ocker|[Cc]ontainer)file$",
                r"(^|/)([Dd]ocker|[Cc]ontainer)file[^/]*$",
            ],
            Manager::DockerCompose => &[r"(^|/)(?:docker-)?compose[^/]*\.ya?ml$"],
            Manager::GithubActions => &[
                r"(^|/)(workflow-templates|\.(?:github|gitea|forgejo)/(?:workflows|actions))/.+\.ya?ml$",
                r"(^|/)action\.ya?ml$",
            ],
            Manager::Gitlabci => &[r"\.gitlab-ci\.ya?ml$"],
            Manager::Npm => &[r"(^|/)package\.json$"],
            Manager::Cargo => &[r"(^|/)Cargo\.toml$"],
            Manager::Gomod => &[r"(^|/)go\.mod$"],
            Manager::Maven => &[r"(^|/|\.)pom\.xml$", r"^(((\.mvn)|(\.m2))/)?settings\.xml$"],
            Manager::Gradle => &[
                r"\.gradle(\.kts)?$",
                r"(^|/)gradle\.properties$",
                r"(^|/)gradle/.+\.toml$",
                r"\.versions\.toml$",
            ],
            Manager::Nuget => &[r"\.(?:cs|fs|vb)proj$", r"\.(?:props|targets)$"],
            Manager::Composer => &[r"(^|/)([\w-]*)composer\.json$"],
            Manager::Bundler => &[r"(^|/)Gemfile$"],
            Manager::HelmValues => &[r"(^|/)values\.ya?ml$"],
            Manager::Terraform => &[r"\.tf$"],
            Manager::PreCommit => &[r"(^|/)\.pre-commit-config\.ya?ml$"],
        }
    }

    /// One-line description for `depcfg managers`.
    pub fn describe(self) -> &'static str {
        match self {
            Manager::PipRequirements => "Python requirements files",
            Manager::Pipenv => "Pipenv Pipfile",
            Manager::Poetry => "Poetry pyproject.toml",
            Manager::Pep621 => "PEP 621 pyproject.toml",
            Manager::SetupCfg => "setuptools setup.cfg",
            Manager::Dockerfile => "Container image references in Dockerfiles",
            Manager::DockerCompose => "Images in compose files",
            Manager::GithubActions => "GitHub Actions workflows and actions",
            Manager::Gitlabci => "GitLab CI pipeline files",
            Manager::Npm => "npm package.json manifests",
            Manager::Cargo => "Rust Cargo.toml manifests",
            Manager::Gomod => "Go modules",
            Manager::Maven => "Maven pom.xml",
            Manager::Gradle => "Gradle build scripts and catalogs",
            Manager::Nuget => ".NET project files",
            Manager::Composer => "PHP composer.json",
            Manager::Bundler => "Ruby Gemfile",
            Manager::HelmValues => "Images in Helm values files",
            Manager::Terraform => "Terraform modules and providers",
            Manager::PreCommit => "pre-commit hook repositories",
        }
    }
}
