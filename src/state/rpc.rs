//! RPC-backed registry readers.
//!
//! Encodes getter calls from function signatures (keccak selector plus
//! ABI-encoded parameters), issues them through [`RpcClient`], and decodes
//! the return data with `alloy::dyn_abi`.

use std::sync::Arc;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{keccak256, Address, Bytes, U256};
use async_trait::async_trait;

use crate::rpc::RpcClient;
use crate::types::config::RegistryConfig;
use crate::types::entities::VoteFields;

use super::registries::{
    PubVoteRead, RentRegistryReader, SpectateRegistryReader, StateReadError,
};

const RENT: &str = "rent registry";
const SPECTATE: &str = "spectate registry";

pub struct RpcStateRegistry {
    client: Arc<RpcClient>,
    rent_registry: Address,
    spectate_registry: Address,
}

impl RpcStateRegistry {
    pub fn new(client: Arc<RpcClient>, registries: &RegistryConfig) -> Self {
        Self {
            client,
            rent_registry: registries.rent,
            spectate_registry: registries.spectate,
        }
    }

    async fn read(
        &self,
        contract: &'static str,
        to: Address,
        signature: &str,
        params: Vec<DynSolValue>,
    ) -> Result<DynSolValue, StateReadError> {
        let method = method_name(signature);

        let (selector, output_type) =
            parse_function_signature(signature).map_err(|message| StateReadError::Decode {
                contract,
                method: method.clone(),
                message,
            })?;

        let calldata = encode_calldata(&selector, &params);

        let result = self
            .client
            .call(to, Bytes::from(calldata))
            .await
            .map_err(|e| StateReadError::CallFailed {
                contract,
                method: method.clone(),
                message: e.to_string(),
            })?;

        if result.is_empty() {
            return Err(StateReadError::EmptyResult { contract, method });
        }

        output_type
            .abi_decode(&result)
            .map_err(|e| StateReadError::Decode {
                contract,
                method,
                message: e.to_string(),
            })
    }

    async fn read_uint(
        &self,
        contract: &'static str,
        to: Address,
        signature: &str,
        params: Vec<DynSolValue>,
    ) -> Result<U256, StateReadError> {
        let method = method_name(signature);
        let value = self.read(contract, to, signature, params).await?;
        match single(contract, &method, value)? {
            DynSolValue::Uint(v, _) => Ok(v),
            other => Err(shape_error(contract, &method, "uint256", &other)),
        }
    }

    async fn read_string(
        &self,
        contract: &'static str,
        to: Address,
        signature: &str,
        params: Vec<DynSolValue>,
    ) -> Result<String, StateReadError> {
        let method = method_name(signature);
        let value = self.read(contract, to, signature, params).await?;
        match single(contract, &method, value)? {
            DynSolValue::String(s) => Ok(s),
            other => Err(shape_error(contract, &method, "string", &other)),
        }
    }

    async fn read_address(
        &self,
        contract: &'static str,
        to: Address,
        signature: &str,
        params: Vec<DynSolValue>,
    ) -> Result<Address, StateReadError> {
        let method = method_name(signature);
        let value = self.read(contract, to, signature, params).await?;
        match single(contract, &method, value)? {
            DynSolValue::Address(a) => Ok(a),
            other => Err(shape_error(contract, &method, "address", &other)),
        }
    }

    async fn read_address_array(
        &self,
        contract: &'static str,
        to: Address,
        signature: &str,
        params: Vec<DynSolValue>,
    ) -> Result<Vec<Address>, StateReadError> {
        let method = method_name(signature);
        let value = self.read(contract, to, signature, params).await?;
        match single(contract, &method, value)? {
            DynSolValue::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    DynSolValue::Address(a) => Ok(a),
                    other => Err(shape_error(contract, &method, "address", &other)),
                })
                .collect(),
            other => Err(shape_error(contract, &method, "address[]", &other)),
        }
    }
}

#[async_trait]
impl RentRegistryReader for RpcStateRegistry {
    async fn week_counter(&self) -> Result<U256, StateReadError> {
        self.read_uint(RENT, self.rent_registry, "weekCounter()(uint256)", vec![])
            .await
    }

    async fn npc_active_weeks(&self, npc: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getNPCActiveWeeks(address)(uint256)",
            vec![DynSolValue::Address(npc)],
        )
        .await
    }

    async fn npc_au_claimed_by_week(
        &self,
        npc: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getNPCAuClaimedByWeek(address,uint256)(uint256)",
            vec![DynSolValue::Address(npc), DynSolValue::Uint(week, 256)],
        )
        .await
    }

    async fn npc_au_rent_by_week(
        &self,
        npc: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getNPCAuRentByWeek(address,uint256)(uint256)",
            vec![DynSolValue::Address(npc), DynSolValue::Uint(week, 256)],
        )
        .await
    }

    async fn npc_weighted_score_total(&self, npc: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getNPCCurrentWeightedScoreTotal(address)(uint256)",
            vec![DynSolValue::Address(npc)],
        )
        .await
    }

    async fn npc_weighted_score_weekly(&self, npc: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getNPCCurrentWeightedScoreWeekly(address)(uint256)",
            vec![DynSolValue::Address(npc)],
        )
        .await
    }

    async fn spectator_portion(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorPortion(address,uint256)(uint256)",
            vec![DynSolValue::Address(spectator), DynSolValue::Uint(week, 256)],
        )
        .await
    }

    async fn spectator_au_claimed(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorAUClaimed(address)(uint256)",
            vec![DynSolValue::Address(spectator)],
        )
        .await
    }

    async fn spectator_au_unclaimed(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorAUUnclaimed(address)(uint256)",
            vec![DynSolValue::Address(spectator)],
        )
        .await
    }

    async fn spectator_au_earned(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorAUEarned(address)(uint256)",
            vec![DynSolValue::Address(spectator)],
        )
        .await
    }

    async fn spectator_week_weight(&self, spectator: Address) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorCurrentWeekWeight(address)(uint256)",
            vec![DynSolValue::Address(spectator)],
        )
        .await
    }

    async fn spectator_weight_by_week(
        &self,
        spectator: Address,
        week: U256,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            RENT,
            self.rent_registry,
            "getSpectatorWeightByWeek(address,uint256)(uint256)",
            vec![DynSolValue::Address(spectator), DynSolValue::Uint(week, 256)],
        )
        .await
    }
}

#[async_trait]
impl SpectateRegistryReader for RpcStateRegistry {
    async fn weekly_npcs(&self) -> Result<Vec<Address>, StateReadError> {
        self.read_address_array(
            SPECTATE,
            self.spectate_registry,
            "getWeeklyNPCs()(address[])",
            vec![],
        )
        .await
    }

    async fn weekly_spectators(&self) -> Result<Vec<Address>, StateReadError> {
        self.read_address_array(
            SPECTATE,
            self.spectate_registry,
            "getWeeklySpectators()(address[])",
            vec![],
        )
        .await
    }

    async fn npc_vote_count(
        &self,
        spectator: Address,
        npc: Address,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            SPECTATE,
            self.spectate_registry,
            "getNPCVoteCount(address,address)(uint256)",
            vec![DynSolValue::Address(spectator), DynSolValue::Address(npc)],
        )
        .await
    }

    async fn pub_vote_count(
        &self,
        profile_id: U256,
        pub_id: U256,
    ) -> Result<U256, StateReadError> {
        self.read_uint(
            SPECTATE,
            self.spectate_registry,
            "getPubVoteCount(uint256,uint256)(uint256)",
            vec![
                DynSolValue::Uint(profile_id, 256),
                DynSolValue::Uint(pub_id, 256),
            ],
        )
        .await
    }

    async fn npc_vote(
        &self,
        spectator: Address,
        npc: Address,
        index: U256,
    ) -> Result<VoteFields, StateReadError> {
        let args = || {
            vec![
                DynSolValue::Address(spectator),
                DynSolValue::Address(npc),
                DynSolValue::Uint(index, 256),
            ]
        };
        let to = self.spectate_registry;

        Ok(VoteFields {
            comment: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteComment(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            model: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteModel(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            chat_context: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteChatContext(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            sprite_sheet: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteSpriteSheet(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            lora: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteLora(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            personality: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVotePersonality(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            tokenizer: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteTokenizer(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            training: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteTraining(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            completed_jobs: self
                .read_uint(
                    SPECTATE,
                    to,
                    "getNPCVoteCompletedJobs(address,address,uint256)(uint256)",
                    args(),
                )
                .await?,
            scene: self
                .read_string(
                    SPECTATE,
                    to,
                    "getNPCVoteScene(address,address,uint256)(string)",
                    args(),
                )
                .await?,
            global: self
                .read_uint(
                    SPECTATE,
                    to,
                    "getNPCVoteGlobal(address,address,uint256)(uint256)",
                    args(),
                )
                .await?,
        })
    }

    async fn pub_vote(
        &self,
        profile_id: U256,
        pub_id: U256,
        index: U256,
    ) -> Result<PubVoteRead, StateReadError> {
        let args = || {
            vec![
                DynSolValue::Uint(profile_id, 256),
                DynSolValue::Uint(pub_id, 256),
                DynSolValue::Uint(index, 256),
            ]
        };
        let to = self.spectate_registry;

        let npc = self
            .read_address(
                SPECTATE,
                to,
                "getPubVoteNPC(uint256,uint256,uint256)(address)",
                args(),
            )
            .await?;

        let fields = VoteFields {
            comment: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteComment(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            model: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteModel(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            chat_context: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteChatContext(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            sprite_sheet: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteSpriteSheet(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            lora: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteLora(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            personality: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVotePersonality(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            tokenizer: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteTokenizer(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            training: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteTraining(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            completed_jobs: self
                .read_uint(
                    SPECTATE,
                    to,
                    "getPubVoteCompletedJobs(uint256,uint256,uint256)(uint256)",
                    args(),
                )
                .await?,
            scene: self
                .read_string(
                    SPECTATE,
                    to,
                    "getPubVoteScene(uint256,uint256,uint256)(string)",
                    args(),
                )
                .await?,
            global: self
                .read_uint(
                    SPECTATE,
                    to,
                    "getPubVoteGlobal(uint256,uint256,uint256)(uint256)",
                    args(),
                )
                .await?,
        };

        Ok(PubVoteRead { npc, fields })
    }
}

/// Extract the method name from a signature like "weekCounter()(uint256)".
fn method_name(signature: &str) -> String {
    signature
        .split('(')
        .next()
        .unwrap_or(signature)
        .to_string()
}

/// Parse a function signature like "balanceOf(address)(uint256)" into
/// selector and output type.
fn parse_function_signature(sig: &str) -> Result<([u8; 4], DynSolType), String> {
    let idx = sig
        .rfind(")(")
        .ok_or_else(|| format!("invalid function signature, missing output type: {}", sig))?;

    let input_sig = &sig[..=idx];
    let output_sig = &sig[idx + 2..sig.len() - 1];

    // Selector is the first 4 bytes of keccak256 over the input signature
    let selector_bytes = keccak256(input_sig.as_bytes());
    let selector: [u8; 4] = selector_bytes[..4].try_into().unwrap();

    let output_type = DynSolType::parse(&format!("({})", output_sig))
        .map_err(|e| format!("failed to parse output type '{}': {}", output_sig, e))?;

    Ok((selector, output_type))
}

/// Encode calldata for an `eth_call`.
fn encode_calldata(selector: &[u8; 4], params: &[DynSolValue]) -> Vec<u8> {
    let mut calldata = selector.to_vec();

    if !params.is_empty() {
        let tuple = DynSolValue::Tuple(params.to_vec());
        calldata.extend(tuple.abi_encode_params());
    }

    calldata
}

/// Unwrap the single-element tuple that function returns decode into.
fn single(
    contract: &'static str,
    method: &str,
    value: DynSolValue,
) -> Result<DynSolValue, StateReadError> {
    match value {
        DynSolValue::Tuple(mut items) if items.len() == 1 => Ok(items.remove(0)),
        other => Err(shape_error(contract, method, "single return value", &other)),
    }
}

fn shape_error(
    contract: &'static str,
    method: &str,
    expected: &str,
    actual: &DynSolValue,
) -> StateReadError {
    StateReadError::Decode {
        contract,
        method: method.to_string(),
        message: format!("expected {}, got {:?}", expected, actual.as_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_function_signature_selector() {
        // Known selector for balanceOf(address): 0x70a08231
        let (selector, output) =
            parse_function_signature("balanceOf(address)(uint256)").unwrap();
        assert_eq!(selector, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(output, DynSolType::Tuple(vec![DynSolType::Uint(256)]));
    }

    #[test]
    fn test_parse_function_signature_no_params() {
        let (selector, _) = parse_function_signature("weekCounter()(uint256)").unwrap();
        let expected = keccak256("weekCounter()".as_bytes());
        assert_eq!(selector, expected[..4]);
    }

    #[test]
    fn test_parse_function_signature_rejects_missing_output() {
        assert!(parse_function_signature("weekCounter()").is_err());
    }

    #[test]
    fn test_encode_calldata_layout() {
        let (selector, _) =
            parse_function_signature("getNPCActiveWeeks(address)(uint256)").unwrap();
        let npc = Address::repeat_byte(0xaa);
        let calldata = encode_calldata(&selector, &[DynSolValue::Address(npc)]);

        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(&calldata[..4], &selector);
        // address is left-padded to 32 bytes
        assert_eq!(&calldata[4..16], &[0u8; 12]);
        assert_eq!(&calldata[16..36], npc.as_slice());
    }

    #[test]
    fn test_single_unwraps_tuple() {
        let value = DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(5u64), 256)]);
        match single("rent registry", "weekCounter", value).unwrap() {
            DynSolValue::Uint(v, _) => assert_eq!(v, U256::from(5u64)),
            other => panic!("unexpected value: {:?}", other),
        }
    }
}
