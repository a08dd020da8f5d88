// Encrypt/Decrypt Workflow
// Immutable stage machine driving a caller through the RSA steps

use log::debug;
use num_traits::Zero;

use crate::error::{RsaError, RsaResult};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::encrypt::{transform, transform_checked};
use crate::rsa::keygen::{KeyPair, KeyParameters, KeyTable, RsaPrivateKey, RsaPublicKey};
use crate::util::RsaConfig;

/// Where a session currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Home,
    PrimesChosen {
        params: KeyParameters,
        table: KeyTable,
    },
    KeysChosen {
        params: KeyParameters,
        table: KeyTable,
        pair: KeyPair,
    },
    EncryptedResult {
        public_key: RsaPublicKey,
        private_key: RsaPrivateKey,
        ciphertext: Vec<RsaBigInt>,
    },
    DecryptInput,
    DecryptedResult {
        private_key: RsaPrivateKey,
        plaintext: Vec<RsaBigInt>,
    },
}

impl Stage {
    /// Short label for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Home => "Home",
            Stage::PrimesChosen { .. } => "PrimesChosen",
            Stage::KeysChosen { .. } => "KeysChosen",
            Stage::EncryptedResult { .. } => "EncryptedResult",
            Stage::DecryptInput => "DecryptInput",
            Stage::DecryptedResult { .. } => "DecryptedResult",
        }
    }
}

/// Something the caller did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Enter (or re-enter) two primes; the key table is rebuilt from scratch
    ChoosePrimes { p: RsaBigInt, q: RsaBigInt },
    /// Pick a row of the key table by position
    SelectKey { index: usize },
    Encrypt,
    BeginDecrypt,
    Decrypt { n: RsaBigInt, d: RsaBigInt },
    Back,
    /// Return home, keeping the loaded values
    Reset,
}

impl Input {
    /// Short label for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Input::ChoosePrimes { .. } => "ChoosePrimes",
            Input::SelectKey { .. } => "SelectKey",
            Input::Encrypt => "Encrypt",
            Input::BeginDecrypt => "BeginDecrypt",
            Input::Decrypt { .. } => "Decrypt",
            Input::Back => "Back",
            Input::Reset => "Reset",
        }
    }
}

/// Loaded data plus the current stage
///
/// Sessions are never mutated; [`Session::advance`] returns the next one and
/// leaves `self` untouched, so a rejected input costs nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    config: RsaConfig,
    values: Vec<RsaBigInt>,
    stage: Stage,
}

impl Session {
    pub fn new(values: Vec<RsaBigInt>, config: RsaConfig) -> Self {
        Self {
            config,
            values,
            stage: Stage::Home,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn values(&self) -> &[RsaBigInt] {
        &self.values
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    fn with_stage(&self, stage: Stage) -> Self {
        Self {
            config: self.config.clone(),
            values: self.values.clone(),
            stage,
        }
    }

    /// Apply `input` and return the resulting session
    pub fn advance(&self, input: Input) -> RsaResult<Self> {
        let from = self.stage.name();
        let input_name = input.name();
        let next = self.next_stage(input)?;
        debug!("workflow {from} --{input_name}--> {}", next.name());
        Ok(self.with_stage(next))
    }

    fn next_stage(&self, input: Input) -> RsaResult<Stage> {
        let invalid = || RsaError::InvalidTransition {
            stage: self.stage.name(),
            input: input.name(),
        };

        match (&self.stage, &input) {
            (_, Input::Reset) => Ok(Stage::Home),

            (
                Stage::Home | Stage::PrimesChosen { .. } | Stage::KeysChosen { .. },
                Input::ChoosePrimes { p, q },
            ) => {
                let rounds = self.config.miller_rabin_rounds;
                let params = KeyParameters::with_rounds(p.clone(), q.clone(), rounds)?;
                let table = params.key_table(self.config.enumeration_bound);
                Ok(Stage::PrimesChosen { params, table })
            }

            (
                Stage::PrimesChosen { params, table } | Stage::KeysChosen { params, table, .. },
                Input::SelectKey { index },
            ) => {
                if table.is_empty() {
                    return Err(RsaError::EmptyKeyTable);
                }
                let pair = table.get(*index).ok_or(RsaError::KeyIndexOutOfRange {
                    index: *index,
                    len: table.len(),
                })?;
                Ok(Stage::KeysChosen {
                    params: params.clone(),
                    table: table.clone(),
                    pair: pair.clone(),
                })
            }

            (Stage::KeysChosen { params, pair, .. }, Input::Encrypt) => {
                let (public_key, private_key) = params.bind(pair);
                let ciphertext = transform_checked(&self.values, &public_key.e, &public_key.n)?;
                Ok(Stage::EncryptedResult {
                    public_key,
                    private_key,
                    ciphertext,
                })
            }

            (Stage::Home, Input::BeginDecrypt) => Ok(Stage::DecryptInput),

            (Stage::DecryptInput, Input::Decrypt { n, d }) => {
                if n.is_zero() || d.is_zero() {
                    return Err(RsaError::InvalidInput(
                        "n and d must be greater than 0".to_string(),
                    ));
                }
                let plaintext = transform(&self.values, d, n)?;
                Ok(Stage::DecryptedResult {
                    private_key: RsaPrivateKey {
                        n: n.clone(),
                        d: d.clone(),
                    },
                    plaintext,
                })
            }

            (Stage::KeysChosen { params, table, .. }, Input::Back) => Ok(Stage::PrimesChosen {
                params: params.clone(),
                table: table.clone(),
            }),
            (
                Stage::PrimesChosen { .. }
                | Stage::DecryptInput
                | Stage::EncryptedResult { .. }
                | Stage::DecryptedResult { .. },
                Input::Back,
            ) => Ok(Stage::Home),

            _ => Err(invalid()),
        }
    }
}
