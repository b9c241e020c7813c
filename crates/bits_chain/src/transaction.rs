//! Programmable transaction descriptors.
//!
//! A [`TransactionBlock`] is an ordered list of commands over a table of
//! inputs. Commands refer to inputs, to the gas coin, or to results of earlier
//! commands through [`Argument`]s. The wallet serializes and signs the block;
//! nothing here talks to the network.

use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::types::ObjectRef;

/// A value passed into the transaction from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallArg {
    /// A pure BCS-encodable value.
    Pure { value: PureValue },
    /// An on-chain object, resolved by the wallet to its current version.
    Object { object_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PureValue {
    U64(u64),
    Address(String),
}

/// Reference to a value inside the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    MoveCall {
        target: String,
        arguments: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
}

/// Builder and descriptor for one programmable transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlock {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    gas_budget: Option<u64>,
    gas_payment: Vec<ObjectRef>,
}

impl TransactionBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gas coin, usable as a command argument.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<Argument, ChainError> {
        self.push_input(CallArg::Pure {
            value: PureValue::U64(value),
        })
    }

    pub fn pure_address(&mut self, address: impl Into<String>) -> Result<Argument, ChainError> {
        self.push_input(CallArg::Pure {
            value: PureValue::Address(address.into()),
        })
    }

    /// Object input. Referencing the same object twice reuses its input slot.
    pub fn object(&mut self, object_id: impl Into<String>) -> Result<Argument, ChainError> {
        let object_id = object_id.into();
        let existing = self.inputs.iter().position(|input| {
            matches!(input, CallArg::Object { object_id: id } if *id == object_id)
        });
        match existing {
            Some(index) => Ok(Argument::Input(slot(index, "inputs")?)),
            None => self.push_input(CallArg::Object { object_id }),
        }
    }

    /// Split `amounts` off `coin`. Returns one argument per new coin.
    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: Vec<Argument>,
    ) -> Result<Vec<Argument>, ChainError> {
        let count = slot(amounts.len(), "split amounts")?;
        let index = self.push_command(Command::SplitCoins { coin, amounts })?;
        Ok((0..count)
            .map(|i| Argument::NestedResult(index, i))
            .collect())
    }

    pub fn merge_coins(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> Result<(), ChainError> {
        self.push_command(Command::MergeCoins {
            destination,
            sources,
        })?;
        Ok(())
    }

    /// Invoke `target` (`package::module::function`). Returns the call's
    /// result.
    pub fn move_call(
        &mut self,
        target: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> Result<Argument, ChainError> {
        let index = self.push_command(Command::MoveCall {
            target: target.into(),
            arguments,
        })?;
        Ok(Argument::Result(index))
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        address: Argument,
    ) -> Result<(), ChainError> {
        self.push_command(Command::TransferObjects { objects, address })?;
        Ok(())
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas_budget = Some(budget);
    }

    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) {
        self.gas_payment = payment;
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }

    pub fn gas_payment(&self) -> &[ObjectRef] {
        &self.gas_payment
    }

    /// Resolve an argument to its input, if it names one.
    pub fn input(&self, argument: Argument) -> Option<&CallArg> {
        match argument {
            Argument::Input(index) => self.inputs.get(index as usize),
            _ => None,
        }
    }

    /// Targets of every move call, in command order.
    pub fn move_call_targets(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::MoveCall { target, .. } => Some(target.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Object ids referenced as inputs, in input order.
    pub fn object_ids(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .filter_map(|input| match input {
                CallArg::Object { object_id } => Some(object_id.as_str()),
                CallArg::Pure { .. } => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn push_input(&mut self, input: CallArg) -> Result<Argument, ChainError> {
        let index = slot(self.inputs.len(), "inputs")?;
        self.inputs.push(input);
        Ok(Argument::Input(index))
    }

    fn push_command(&mut self, command: Command) -> Result<u16, ChainError> {
        let index = slot(self.commands.len(), "commands")?;
        self.commands.push(command);
        Ok(index)
    }
}

/// Argument indices are `u16` on the wire.
fn slot(index: usize, table: &'static str) -> Result<u16, ChainError> {
    u16::try_from(index).map_err(|_| ChainError::TransactionTooLarge(table))
}
