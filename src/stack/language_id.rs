crate::define_id_enum! {
    /// Language family a descriptor belongs to
    LanguageId {
        Python => "python" : "Python" | "py",
        Node => "node" : "Node.js" | "nodejs" | "javascript",
        Java => "java" : "Java" | "jvm",
        DotNet => "dotnet" : ".NET" | "csharp" | "c#",
    }
}
