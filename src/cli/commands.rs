use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bazel BUILD and WORKSPACE generation for multi-module Maven projects
#[derive(Parser, Debug)]
#[command(
    name = "bazelize",
    about = "Generate Bazel BUILD and WORKSPACE files from a multi-module Maven project",
    version,
    author,
    long_about = "bazelize translates a tree of Maven modules into Bazel build files in four \
                  passes that talk to each other through small JSON files: module (per module), \
                  meta (whole tree), build (per module) and workspace (whole tree). \
                  `bazelize all` runs the four passes in order over every discovered module."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        help = "Keep previous outputs under a timestamp suffix before regenerating them"
    )]
    pub backup: bool,

    #[arg(
        long,
        global = true,
        value_name = "SUFFIX",
        help = "Keep previous outputs under this suffix (implies --backup)"
    )]
    pub suffix: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory with <name>.template files overriding the built-in templates"
    )]
    pub template_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Pass 1: describe one module",
        long_about = "Reads the module's pom.xml, classifies its source directories and writes \
                      tmp-bzl-module.json into the module directory.\n\n\
                      Examples:\n  \
                      bazelize module lib/widgets\n  \
                      bazelize module --root /src/acme /src/acme/lib/widgets"
    )]
    Module(ModuleArgs),

    #[command(
        about = "Pass 2: merge module records into the global manifest",
        long_about = "Collects every tmp-bzl-module.json below the root and writes the sorted \
                      global manifest tmp-bzl-meta.json at the root."
    )]
    Meta(TreeArgs),

    #[command(
        about = "Pass 3: write one module's BUILD file and dependency shards",
        long_about = "Resolves the module's dependencies against the global manifest, writes its \
                      BUILD file and the tmp-bzl-dependency.json / tmp-bzl-server.json shards.\n\n\
                      Examples:\n  \
                      bazelize build lib/widgets\n  \
                      bazelize build --add-hash --add-server lib/widgets"
    )]
    Build(BuildArgs),

    #[command(
        about = "Pass 4: write the root WORKSPACE",
        long_about = "Merges every dependency and server shard of the tree into the root \
                      WORKSPACE. An existing WORKSPACE is only replaced with --backup or --suffix."
    )]
    Workspace(WorkspaceArgs),

    #[command(
        about = "Run all four passes over every module below the root",
        long_about = "Discovers every pom.xml below the root and runs the module, meta, build and \
                      workspace passes in order, sharing one backup suffix.\n\n\
                      Examples:\n  \
                      bazelize all\n  \
                      bazelize all /src/acme --backup --workspace-name acme"
    )]
    All(AllArgs),

    #[command(
        about = "Append a java_binary rule to the root BUILD",
        long_about = "Finds the java_library rule of every BUILD file below the root and appends \
                      one java_binary rule depending on all of them to the root BUILD."
    )]
    Binary(BinaryArgs),

    #[command(
        about = "Append java_test rules to one module's BUILD",
        long_about = "Appends one java_test rule per test source file of the module, each \
                      depending on the module's library rule."
    )]
    Test(TestArgs),

    #[command(
        about = "Remove intermediate files and backups",
        long_about = "Deletes tmp-bzl-*.json files and BUILD_* / WORKSPACE_* backups below the \
                      root. With --expunge the generated BUILD and WORKSPACE files go too."
    )]
    Clean(CleanArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceFilterArgs {
    #[arg(
        long,
        value_name = "REGEX",
        help = "Pattern a source file path must match (empty disables)"
    )]
    pub src_white_list: Option<String>,

    #[arg(
        long,
        value_name = "REGEX",
        help = "Pattern excluding directories from source classification (empty disables)"
    )]
    pub src_black_list: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DependencyArgs {
    #[arg(
        long,
        value_name = "REGEX",
        help = "Pattern excluding dependencies by derived name (empty disables)"
    )]
    pub dep_black_list: Option<String>,

    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        help = "Record dependency scopes in the dependency shard [default: true]"
    )]
    pub add_scope: Option<bool>,

    #[arg(long, help = "Record the SHA-1 of each dependency jar")]
    pub add_hash: bool,

    #[arg(long, help = "Record the repository each dependency was downloaded from")]
    pub add_server: bool,

    #[arg(long, value_name = "ID", help = "Repository id used when none is recorded")]
    pub default_server: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Read dependencies from `mvn dependency:list -DoutputFile=FILE` output instead of pom.xml"
    )]
    pub dependency_list: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Maven settings.xml declaring repository servers")]
    pub settings: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Maven local repository")]
    pub local_repository: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Main resources directory, relative to each module")]
    pub res_main: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ModuleArgs {
    #[arg(value_name = "DIR", help = "Module directory (defaults to current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Root of the build tree (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub filters: SourceFilterArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    #[arg(value_name = "ROOT", help = "Root of the build tree (defaults to current directory)")]
    pub root: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(value_name = "DIR", help = "Module directory (defaults to current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Root of the build tree (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub dependencies: DependencyArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct WorkspaceArgs {
    #[arg(value_name = "ROOT", help = "Root of the build tree (defaults to current directory)")]
    pub root: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Emit a workspace(name = ...) header")]
    pub workspace_name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AllArgs {
    #[arg(value_name = "ROOT", help = "Root of the build tree (defaults to current directory)")]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub filters: SourceFilterArgs,

    #[command(flatten)]
    pub dependencies: DependencyArgs,

    #[arg(long, value_name = "NAME", help = "Emit a workspace(name = ...) header")]
    pub workspace_name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BinaryArgs {
    #[arg(value_name = "ROOT", help = "Root of the build tree (defaults to current directory)")]
    pub root: Option<PathBuf>,

    #[arg(long, value_name = "CLASS", help = "Fully qualified main class")]
    pub main_class: String,

    #[arg(long, value_name = "NAME", help = "Rule name (defaults to the main class)")]
    pub bin_name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TestArgs {
    #[arg(value_name = "DIR", help = "Module directory (defaults to current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Test sources directory, relative to the module")]
    pub src_test: Option<String>,

    #[arg(long, value_name = "DIR", help = "Test resources directory, relative to the module")]
    pub res_test: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    #[arg(value_name = "ROOT", help = "Root of the build tree (defaults to current directory)")]
    pub root: Option<PathBuf>,

    #[arg(long, help = "Also delete generated BUILD and WORKSPACE files")]
    pub expunge: bool,
}
