crate::define_id_enum! {
    /// Package manager or build tool reported in a descriptor
    BuildSystemId {
        Pip => "pip" : "pip",
        Poetry => "poetry" : "Poetry",
        Pipenv => "pipenv" : "Pipenv",
        Npm => "npm" : "npm",
        Yarn => "yarn" : "Yarn",
        Pnpm => "pnpm" : "pnpm",
        Maven => "maven" : "Maven",
        Gradle => "gradle" : "Gradle",
        /// Plain sources without a build tool
        None => "none" : "none",
    }
}
