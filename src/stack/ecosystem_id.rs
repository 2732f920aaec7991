crate::define_id_enum! {
    /// Supported ecosystem, each with its own classifier and template map
    EcosystemId {
        Python => "python" : "Python",
        Node => "node" : "Node.js" | "nodejs",
        Maven => "maven" : "Maven",
        Gradle => "gradle" : "Gradle",
        Java => "java" : "Java",
        DotNet => "dotnet" : ".NET",
    }
}

crate::define_id_enum! {
    /// Target CI/CD system or container build file
    PlatformId {
        Jenkins => "jenkins" : "Jenkins",
        Gitlab => "gitlab" : "GitLab CI" | "gitlab-ci",
        Github => "github" : "GitHub Actions" | "github-actions",
        Docker => "docker" : "Docker" | "dockerfile",
    }
}

impl PlatformId {
    /// Platforms a caller may request; the container file is always attempted.
    pub fn requestable() -> &'static [PlatformId] {
        &[PlatformId::Jenkins, PlatformId::Gitlab, PlatformId::Github]
    }
}
