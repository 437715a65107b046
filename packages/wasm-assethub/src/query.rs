//! NFT collection queries
//!
//! Storage reads go through a host-provided [`CollectionReader`]; this
//! module only defines the record shapes and the call sequences built from
//! them.

use crate::address::Address;
use crate::call::{create_collection, mint_nft, transfer_nft, MintNftParams, TransferNftParams};
use crate::call::{deserialize_u128, CallDescriptor};
use crate::client::ClientError;
use crate::error::{Result, WasmAssetHubError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};

/// `Nfts.Collection` storage value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetails {
    pub owner: Address,
    /// Reserved deposit; serialized as a decimal string
    #[serde(
        serialize_with = "serialize_u128_string",
        deserialize_with = "deserialize_u128"
    )]
    pub owner_deposit: u128,
    pub items: u32,
    pub item_metadatas: u32,
    pub item_configs: u32,
    pub attributes: u32,
}

/// One `Nfts.Collection` storage entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: u32,
    pub details: CollectionDetails,
}

fn serialize_u128_string<S: Serializer>(
    value: &u128,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Read access to the `Nfts` pallet storage
#[async_trait]
pub trait CollectionReader: Send + Sync {
    /// `Nfts.NextCollectionId`, `None` before the first collection exists
    async fn next_collection_id(&self) -> std::result::Result<Option<u32>, ClientError>;

    async fn collection(
        &self,
        id: u32,
    ) -> std::result::Result<Option<CollectionDetails>, ClientError>;

    async fn collections(&self) -> std::result::Result<Vec<CollectionEntry>, ClientError>;
}

/// Id the next `Nfts.create` will be assigned
pub async fn next_collection(reader: &dyn CollectionReader) -> Result<u32> {
    reader
        .next_collection_id()
        .await
        .map_err(query_error)?
        .ok_or_else(|| WasmAssetHubError::Query("No next collection id".to_string()))
}

/// Collections whose owner is `owner`, ordered by id
pub async fn collections_owned_by(
    reader: &dyn CollectionReader,
    owner: &Address,
) -> Result<Vec<CollectionEntry>> {
    let mut owned: Vec<_> = reader
        .collections()
        .await
        .map_err(query_error)?
        .into_iter()
        .filter(|entry| &entry.details.owner == owner)
        .collect();
    owned.sort_by_key(|entry| entry.id);
    Ok(owned)
}

/// Calls that create a collection, mint its first item to `admin` and hand
/// it to `recipient`. The item id equals the collection id. Meant to be
/// submitted as one atomic batch, since the mint only works once the
/// create has run.
pub async fn new_collection_calls(
    reader: &dyn CollectionReader,
    admin: &Address,
    recipient: &Address,
) -> Result<Vec<CallDescriptor>> {
    let collection_id = next_collection(reader).await?;
    tracing::debug!(collection_id, "planning new collection");

    Ok(vec![
        create_collection(admin.clone())?,
        mint_nft(MintNftParams {
            collection_id: collection_id.to_string(),
            recipient: Some(admin.clone()),
            item_id: collection_id,
        })?,
        transfer_nft(TransferNftParams {
            collection_id: Some(collection_id),
            item_id: Some(collection_id),
            recipient: Some(recipient.clone()),
        })?,
    ])
}

fn query_error(err: ClientError) -> WasmAssetHubError {
    WasmAssetHubError::Query(err.message)
}
