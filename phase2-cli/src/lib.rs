pub mod cli;
pub use cli::*;

use setup_utils::{curve_from_str, CheckForCorrectness, CurveKind};

use gumdrop::Options;

/// Contributors skip the point checks on their challenge unless forced.
pub const DEFAULT_CONTRIBUTE_CHECK_INPUT_CORRECTNESS: CheckForCorrectness = CheckForCorrectness::No;
pub const DEFAULT_VERIFY_CHECK_INPUT_CORRECTNESS: CheckForCorrectness = CheckForCorrectness::Full;

#[derive(Debug, Options, Clone)]
pub struct Phase2Opts {
    help: bool,
    #[options(
        help = "the elliptic curve to use",
        default = "bn254",
        parse(try_from_str = "curve_from_str")
    )]
    pub curve_kind: CurveKind,
    #[options(
        help = "whether to always check whether incoming files are in correct subgroup and non-zero",
        default = "false"
    )]
    pub force_correctness_checks: bool,
    #[options(command)]
    pub command: Option<Command>,
}

impl Phase2Opts {
    /// The input checking policy of a command with the given default.
    pub fn correctness_check(&self, default: CheckForCorrectness) -> CheckForCorrectness {
        if self.force_correctness_checks {
            CheckForCorrectness::Full
        } else {
            default
        }
    }
}

// The supported commands
#[derive(Debug, Options, Clone)]
pub enum Command {
    #[options(help = "creates a powers of tau file from known trapdoors, for testing only")]
    DummyPowersoftau(DummyPowersOfTauOpts),
    #[options(help = "computes the Lagrange evaluations of the powers of tau for a circuit")]
    Lagrange(LagrangeOpts),
    #[options(help = "computes the circuit specific linear combination")]
    LinearCombination(LinearCombinationOpts),
    #[options(help = "creates the first challenge of the ceremony")]
    Begin(BeginOpts),
    #[options(help = "contribute to the ceremony by producing a response to a challenge")]
    Contribute(ContributeOpts),
    #[options(help = "verify a response and produce the next challenge")]
    VerifyContribution(VerifyContributionOpts),
    #[options(help = "replay the transcript and check it against the final challenge")]
    VerifyTranscript(VerifyTranscriptOpts),
    #[options(help = "create the Groth16 keypair from the final challenge")]
    CreateKeypair(CreateKeypairOpts),
    #[options(help = "run the whole phase 2 with a single known contribution, for testing only")]
    DummyPhase2(DummyPhase2Opts),
}
