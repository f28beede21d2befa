use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modsync completions bash > ~/.bash_completion.d/modsync\n\n\
                  Generate zsh completions:\n    modsync completions zsh > ~/.zfunc/_modsync\n\n\
                  Generate fish completions:\n    modsync completions fish > ~/.config/fish/completions/modsync.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
