//! `quillc` — command line client for the Quill token chain.

use std::io::BufRead;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use quill_client::json::{permission_from_arg, signed_transaction_from_arg, value_from_file_or_inline};
use quill_client::prelude::Result;
use quill_client::types::{
    Action, Compression, IssueToken, NewAccount, NewDomain, NewGroup, PackedTransaction,
    Permission, PublicKey, SignedTransaction, TransferFunds, TransferToken, UpdateDomain,
    UpdateGroup, UpdateOwner,
};
use quill_client::types::validate_name;
use quill_client::{
    ChainClient, ClientConfig, Error, HttpClient, Outcome, TxOptions, TxPipeline, WalletClient,
};

#[derive(Parser, Debug)]
#[command(name = "quillc", version, about = "Command line client for the Quill token chain")]
struct Cli {
    /// The http/https URL where quilld is running
    #[arg(short = 'u', long = "url", global = true)]
    url: Option<String>,

    /// The http/https URL where quillwd is running
    #[arg(long = "wallet-url", global = true)]
    wallet_url: Option<String>,

    /// Output verbose error information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that submits a transaction.
#[derive(Args, Debug, Clone)]
struct StandardTxArgs {
    /// Time in seconds before the transaction expires
    #[arg(short = 'x', long, default_value_t = quill_client::consts::DEFAULT_EXPIRATION_SECS)]
    expiration: u64,

    /// Do not resolve keys or sign the transaction
    #[arg(short, long)]
    skip_sign: bool,

    /// Do not broadcast; print the final transaction instead
    #[arg(short, long)]
    dont_broadcast: bool,

    /// Reference block num or block id used for TAPOS
    #[arg(short, long)]
    ref_block: Option<String>,

    /// Compression mode for the packed transaction (none, zstd)
    #[arg(short, long, default_value_t = Compression::None)]
    compression: Compression,
}

impl StandardTxArgs {
    fn to_options(&self) -> TxOptions {
        TxOptions {
            expiration_secs: self.expiration,
            ref_block: self.ref_block.clone(),
            skip_sign: self.skip_sign,
            dont_broadcast: self.dont_broadcast,
            compression: self.compression,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve version information
    #[command(subcommand)]
    Version(VersionCmd),
    /// Retrieve items and information from the blockchain
    #[command(subcommand)]
    Get(GetCmd),
    /// Create or update a domain
    #[command(subcommand)]
    Domain(DomainCmd),
    /// Issue or transfer tokens
    #[command(subcommand)]
    Token(TokenCmd),
    /// Create or update a permission group
    #[command(subcommand)]
    Group(GroupCmd),
    /// Create or update accounts and transfer funds between them
    #[command(subcommand)]
    Account(AccountCmd),
    /// Interact with local p2p network connections
    #[command(subcommand)]
    Net(NetCmd),
    /// Interact with the wallet daemon
    #[command(subcommand)]
    Wallet(WalletCmd),
    /// Push arbitrary transactions to the blockchain
    #[command(subcommand)]
    Push(PushCmd),
}

#[derive(Subcommand, Debug)]
enum VersionCmd {
    /// Version of this client
    Client,
}

#[derive(Subcommand, Debug)]
enum GetCmd {
    /// Current blockchain information
    Info,
    /// A full block by number or id
    Block { block: String },
    /// A transaction by id
    Transaction { id: String },
    /// Transactions referencing an account
    Transactions {
        account_name: String,
        skip_seq: Option<u32>,
        num_seq: Option<u32>,
    },
    /// A domain by name
    Domain { name: String },
    /// A token by domain and name
    Token { domain: String, name: String },
    /// A permission group by id
    Group { id: String },
    /// An account by name
    Account { name: String },
}

#[derive(Subcommand, Debug)]
enum DomainCmd {
    /// Create a new domain
    Create {
        /// Name of the new domain
        name: String,
        /// Public key of the issuer
        issuer: PublicKey,
        /// JSON string or filename defining the ISSUE permission
        #[arg(long, default_value = "default")]
        issue: String,
        /// JSON string or filename defining the TRANSFER permission
        #[arg(long, default_value = "default")]
        transfer: String,
        /// JSON string or filename defining the MANAGE permission
        #[arg(long, default_value = "default")]
        manage: String,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
    /// Update an existing domain
    Update {
        /// Name of the domain
        name: String,
        /// JSON string or filename defining the ISSUE permission
        #[arg(short, long)]
        issue: Option<String>,
        /// JSON string or filename defining the TRANSFER permission
        #[arg(short, long)]
        transfer: Option<String>,
        /// JSON string or filename defining the MANAGE permission
        #[arg(short, long)]
        manage: Option<String>,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCmd {
    /// Issue new tokens in a domain
    Issue {
        /// Name of the domain the tokens are issued in
        domain: String,
        /// Owner the issued tokens belong to
        owner: Vec<PublicKey>,
        /// Names of the tokens to issue
        #[arg(short, long, required = true, num_args = 1..)]
        names: Vec<String>,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
    /// Transfer a token to a new owner
    Transfer {
        /// Name of the domain the token lives in
        domain: String,
        /// Name of the token
        name: String,
        /// Receiving owner key list
        to: Vec<PublicKey>,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
}

#[derive(Subcommand, Debug)]
enum GroupCmd {
    /// Create a new permission group
    Create {
        /// JSON string or filename defining the group
        json: String,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
    /// Update an existing permission group
    Update {
        /// Id of the group
        id: String,
        /// JSON string or filename defining the updated group
        json: String,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCmd {
    /// Create a new account
    Create {
        /// Name of the new account
        name: String,
        /// Owner key list of the new account
        owner: Vec<PublicKey>,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
    /// Transfer funds between accounts
    Transfer {
        /// Sending account
        from: String,
        /// Receiving account
        to: String,
        /// Amount in the chain's decimal text form
        amount: String,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
    /// Update the owner key list of an account
    Update {
        /// Name of the account
        name: String,
        /// New owner key list
        owner: Vec<PublicKey>,
        #[command(flatten)]
        tx: StandardTxArgs,
    },
}

#[derive(Subcommand, Debug)]
enum NetCmd {
    /// Start a new connection to a peer
    Connect { host: String },
    /// Close an existing connection
    Disconnect { host: String },
    /// Status of an existing connection
    Status { host: String },
    /// Status of all existing peers
    Peers,
}

#[derive(Subcommand, Debug)]
enum WalletCmd {
    /// Create a new wallet locally on the wallet daemon
    Create {
        #[arg(short, long, default_value = "default")]
        name: String,
    },
    /// Open an existing wallet
    Open {
        #[arg(short, long, default_value = "default")]
        name: String,
    },
    /// Lock a wallet
    Lock {
        #[arg(short, long, default_value = "default")]
        name: String,
    },
    /// Lock all unlocked wallets
    LockAll,
    /// Unlock a wallet
    Unlock {
        #[arg(short, long, default_value = "default")]
        name: String,
        /// Password returned by wallet create; prompted when absent
        #[arg(long)]
        password: Option<String>,
    },
    /// Import a private key (WIF) into a wallet
    Import {
        #[arg(short, long, default_value = "default")]
        name: String,
        /// Private key in WIF format
        key: String,
    },
    /// List wallets, * marks unlocked ones
    List,
    /// List public keys from all unlocked wallets
    Keys,
}

#[derive(Subcommand, Debug)]
enum PushCmd {
    /// Push a signed JSON transaction as-is
    Transaction {
        /// JSON of the transaction, or the name of a file containing it
        transaction: String,
        /// Compression mode for the packed transaction (none, zstd)
        #[arg(short, long, default_value_t = Compression::None)]
        compression: Compression,
    },
    /// Push an array of signed JSON transactions
    Transactions {
        /// JSON array of transactions, or the name of a file containing it
        transactions: String,
        /// Compression mode for the packed transactions (none, zstd)
        #[arg(short, long, default_value_t = Compression::None)]
        compression: Compression,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    if let Err(err) = run(cli).await {
        if verbose {
            eprintln!("error: {}", err.detail());
        } else {
            eprintln!("error: {err}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.url {
        config.chain_url = url;
    }
    if let Some(url) = cli.wallet_url {
        config.wallet_url = url;
    }
    let transport = Arc::new(HttpClient::new(&config)?);

    match cli.command {
        Command::Version(VersionCmd::Client) => {
            println!("Build version: {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Get(cmd) => run_get(transport, cmd).await,
        Command::Domain(cmd) => run_domain(transport, cmd).await,
        Command::Token(cmd) => run_token(transport, cmd).await,
        Command::Group(cmd) => run_group(transport, cmd).await,
        Command::Account(cmd) => run_account(transport, cmd).await,
        Command::Net(cmd) => run_net(transport, cmd).await,
        Command::Wallet(cmd) => run_wallet(transport, cmd).await,
        Command::Push(cmd) => run_push(transport, cmd).await,
    }
}

fn print_value(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

fn print_outcome(outcome: Outcome) {
    print_value(&outcome.into_value());
}

/// Run one action list through the transaction pipeline and print the
/// terminal result.
async fn send_actions(
    transport: Arc<HttpClient>,
    tx: &StandardTxArgs,
    actions: Vec<Action>,
) -> Result<()> {
    let pipeline = TxPipeline::new(transport, tx.to_options());
    let outcome = pipeline.push_actions(actions).await?;
    print_outcome(outcome);
    Ok(())
}

fn permission_arg(name: &str, arg: &str, default_key: Option<PublicKey>) -> Result<Permission> {
    if arg == "default" {
        Ok(Permission::single(name, default_key))
    } else {
        permission_from_arg(arg)
    }
}

async fn run_get(transport: Arc<HttpClient>, cmd: GetCmd) -> Result<()> {
    let chain = ChainClient::new(transport);
    let value = match cmd {
        GetCmd::Info => serde_json::to_value(chain.get_info().await?)?,
        GetCmd::Block { block } => chain.get_block(&block).await?,
        GetCmd::Transaction { id } => chain.get_transaction(&id).await?,
        GetCmd::Transactions {
            account_name,
            skip_seq,
            num_seq,
        } => chain.get_transactions(&account_name, skip_seq, num_seq).await?,
        GetCmd::Domain { name } => chain.get_domain(&name).await?,
        GetCmd::Token { domain, name } => chain.get_token(&domain, &name).await?,
        GetCmd::Group { id } => chain.get_group(&id).await?,
        GetCmd::Account { name } => chain.get_account(&name).await?,
    };
    print_value(&value);
    Ok(())
}

async fn run_domain(transport: Arc<HttpClient>, cmd: DomainCmd) -> Result<()> {
    match cmd {
        DomainCmd::Create {
            name,
            issuer,
            issue,
            transfer,
            manage,
            tx,
        } => {
            validate_name("domain", &name)?;
            let nd = NewDomain {
                name: name.clone(),
                issue: permission_arg("issue", &issue, Some(issuer.clone()))?,
                transfer: permission_arg("transfer", &transfer, None)?,
                manage: permission_arg("manage", &manage, Some(issuer.clone()))?,
                issuer,
            };
            let action = Action::new("domain", name, &nd)?;
            send_actions(transport, &tx, vec![action]).await
        }
        DomainCmd::Update {
            name,
            issue,
            transfer,
            manage,
            tx,
        } => {
            validate_name("domain", &name)?;
            let ud = UpdateDomain {
                name: name.clone(),
                issue: issue.as_deref().map(permission_from_arg).transpose()?,
                transfer: transfer.as_deref().map(permission_from_arg).transpose()?,
                manage: manage.as_deref().map(permission_from_arg).transpose()?,
            };
            let action = Action::new("domain", name, &ud)?;
            send_actions(transport, &tx, vec![action]).await
        }
    }
}

async fn run_token(transport: Arc<HttpClient>, cmd: TokenCmd) -> Result<()> {
    match cmd {
        TokenCmd::Issue {
            domain,
            owner,
            names,
            tx,
        } => {
            validate_name("domain", &domain)?;
            for name in &names {
                validate_name("token", name)?;
            }
            if owner.is_empty() {
                return Err(Error::Validation(
                    "issued tokens need at least one owner key".to_string(),
                ));
            }
            let it = IssueToken {
                domain: domain.clone(),
                names,
                owner,
            };
            let action = Action::new(domain, "issue", &it)?;
            send_actions(transport, &tx, vec![action]).await
        }
        TokenCmd::Transfer {
            domain,
            name,
            to,
            tx,
        } => {
            validate_name("domain", &domain)?;
            validate_name("token", &name)?;
            if to.is_empty() {
                return Err(Error::Validation(
                    "token transfer needs at least one receiving key".to_string(),
                ));
            }
            let tt = TransferToken {
                domain: domain.clone(),
                name: name.clone(),
                to,
            };
            let action = Action::new(domain, name, &tt)?;
            send_actions(transport, &tx, vec![action]).await
        }
    }
}

async fn run_group(transport: Arc<HttpClient>, cmd: GroupCmd) -> Result<()> {
    match cmd {
        GroupCmd::Create { json, tx } => {
            let ng = NewGroup::from_value(value_from_file_or_inline(&json)?)?;
            let action = Action::new("group", ng.key().to_string(), &ng)?;
            send_actions(transport, &tx, vec![action]).await
        }
        GroupCmd::Update { id, json, tx } => {
            let ug = UpdateGroup {
                id: id.clone(),
                group: value_from_file_or_inline(&json)?,
            };
            let action = Action::new("group", id, &ug)?;
            send_actions(transport, &tx, vec![action]).await
        }
    }
}

async fn run_account(transport: Arc<HttpClient>, cmd: AccountCmd) -> Result<()> {
    match cmd {
        AccountCmd::Create { name, owner, tx } => {
            validate_name("account", &name)?;
            if owner.is_empty() {
                return Err(Error::Validation(
                    "new account needs at least one owner key".to_string(),
                ));
            }
            let na = NewAccount {
                name: name.clone(),
                owner,
            };
            let action = Action::new("account", name, &na)?;
            send_actions(transport, &tx, vec![action]).await
        }
        AccountCmd::Transfer {
            from,
            to,
            amount,
            tx,
        } => {
            validate_name("account", &from)?;
            validate_name("account", &to)?;
            let tf = TransferFunds {
                from: from.clone(),
                to,
                amount,
            };
            let action = Action::new("account", from, &tf)?;
            send_actions(transport, &tx, vec![action]).await
        }
        AccountCmd::Update { name, owner, tx } => {
            validate_name("account", &name)?;
            let uo = UpdateOwner {
                name: name.clone(),
                owner,
            };
            let action = Action::new("account", name, &uo)?;
            send_actions(transport, &tx, vec![action]).await
        }
    }
}

async fn run_net(transport: Arc<HttpClient>, cmd: NetCmd) -> Result<()> {
    let chain = ChainClient::new(transport);
    let value = match cmd {
        NetCmd::Connect { host } => chain.net_connect(&host).await?,
        NetCmd::Disconnect { host } => chain.net_disconnect(&host).await?,
        NetCmd::Status { host } => chain.net_status(&host).await?,
        NetCmd::Peers => chain.net_peers().await?,
    };
    print_value(&value);
    Ok(())
}

async fn run_wallet(transport: Arc<HttpClient>, cmd: WalletCmd) -> Result<()> {
    let wallet = WalletClient::new(transport);
    match cmd {
        WalletCmd::Create { name } => {
            let value = wallet.create(&name).await?;
            println!("Creating wallet: {name}");
            println!("Save the password below to unlock this wallet in the future.");
            println!("Without it, imported keys will not be retrievable.");
            print_value(&value);
        }
        WalletCmd::Open { name } => {
            wallet.open(&name).await?;
            println!("Opened: {name}");
        }
        WalletCmd::Lock { name } => {
            wallet.lock(&name).await?;
            println!("Locked: {name}");
        }
        WalletCmd::LockAll => {
            wallet.lock_all().await?;
            println!("Locked all wallets");
        }
        WalletCmd::Unlock { name, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_line("password: ")?,
            };
            wallet.unlock(&name, &password).await?;
            println!("Unlocked: {name}");
        }
        WalletCmd::Import { name, key } => {
            let value = wallet.import_key(&name, &key).await?;
            print_value(&value);
        }
        WalletCmd::List => {
            println!("Wallets:");
            print_value(&wallet.list_wallets().await?);
        }
        WalletCmd::Keys => {
            let keys = wallet.public_keys().await?;
            print_value(&serde_json::to_value(keys)?);
        }
    }
    Ok(())
}

async fn run_push(transport: Arc<HttpClient>, cmd: PushCmd) -> Result<()> {
    let chain = ChainClient::new(transport);
    match cmd {
        PushCmd::Transaction {
            transaction,
            compression,
        } => {
            let signed = signed_transaction_from_arg(&transaction)?;
            let packed = PackedTransaction::pack(&signed, compression)?;
            print_value(&chain.push_transaction(&packed).await?);
        }
        PushCmd::Transactions {
            transactions,
            compression,
        } => {
            let value = value_from_file_or_inline(&transactions)?;
            let signed: Vec<SignedTransaction> = serde_json::from_value(value)
                .map_err(|err| Error::Validation(format!("failed to parse transaction JSON: {err}")))?;
            let packed = signed
                .iter()
                .map(|trx| PackedTransaction::pack(trx, compression))
                .collect::<Result<Vec<_>>>()?;
            print_value(&chain.push_transactions(&packed).await?);
        }
    }
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
