//! # Repository Module
//!
//! Shop API repositories, one per entity the shell reads.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Shell State Composer                                                  │
//! │       │                                                                 │
//! │       │  backend.collections().list(&ctx)                              │
//! │       ▼                                                                 │
//! │  CollectionRepository                                                  │
//! │  ├── owns its GraphQL document                                         │
//! │  ├── decodes the `data` payload into storefront-core types             │
//! │  └── returns BackendResult<T>                                          │
//! │       │                                                                 │
//! │       │  GraphqlClient::execute                                        │
//! │       ▼                                                                 │
//! │  Shop API (GraphQL over HTTP)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CollectionRepository`] - Catalog collection tree
//! - [`CustomerRepository`] - Signed-in customer
//! - [`ChannelRepository`] - Active channel
//! - [`CountryRepository`] - Countries available for checkout
//! - [`OrderRepository`] - Active order (cart)

pub mod channel;
pub mod collection;
pub mod country;
pub mod customer;
pub mod order;

pub use channel::ChannelRepository;
pub use collection::CollectionRepository;
pub use country::CountryRepository;
pub use customer::{CustomerLookup, CustomerRepository};
pub use order::OrderRepository;
