use std::path::PathBuf;

use anyhow::Context;
use dexchat_client::{
    api::{CommentId, Error, Limits, SortKind, TopicKey, UserVote},
    walk, CommentStore, Coordinator, NewComment, Observer, Snapshot,
};

mod file;
use file::FileBackend;

#[derive(structopt::StructOpt)]
struct Opt {
    /// JSON file the comments are stored in
    #[structopt(short, long, env = "DEXCHAT_STORE", default_value = "dexchat-store.json")]
    store: PathBuf,

    /// Use the question argument as the topic key, without deriving it
    #[structopt(long)]
    raw_key: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print the topic key a question is stored under
    Topic { question: String },

    /// Print the comment thread of a question
    List {
        question: String,

        /// One of new, old, top; defaults to the stored preference
        #[structopt(long)]
        sort: Option<SortKind>,

        /// Print as JSON instead of an indented listing
        #[structopt(long)]
        json: bool,
    },

    /// Post a comment, or a reply with --reply-to
    Post {
        question: String,
        content: String,

        #[structopt(long)]
        author: Option<String>,

        #[structopt(long)]
        reply_to: Option<String>,
    },

    /// Change the content of a comment
    Edit {
        question: String,
        id: String,
        content: String,

        #[structopt(long)]
        author: Option<String>,
    },

    /// Replace a comment by a tombstone
    Delete { question: String, id: String },

    /// Vote on a comment; voting the same way again withdraws the vote
    Vote {
        question: String,
        id: String,

        /// up or down
        vote: UserVote,
    },

    /// Print the sort preference of a question, or set it
    Sort {
        question: String,
        kind: Option<SortKind>,
    },
}

struct ReportErrors;

impl Observer for ReportErrors {
    fn on_change(&mut self, snapshot: &Snapshot) {
        tracing::trace!(comments = snapshot.comments.len(), "state changed");
    }

    fn on_error(&mut self, err: &Error) {
        tracing::error!(%err, "write failed, nothing was changed");
    }
}

fn topic_for(opt: &Opt, question: &str) -> TopicKey {
    match opt.raw_key {
        true => TopicKey::new(question),
        false => TopicKey::from_question(question),
    }
}

fn open(opt: &Opt, question: &str) -> anyhow::Result<Coordinator<FileBackend>> {
    let backend = FileBackend::open(&opt.store)?;
    let mut c = Coordinator::new(
        CommentStore::new(backend),
        topic_for(opt, question),
        Limits::default(),
    );
    c.subscribe(Box::new(ReportErrors));
    Ok(c)
}

fn print_thread(c: &Coordinator<FileBackend>, kind: SortKind) {
    let snapshot = c.snapshot();
    let forest = c.tree(kind);
    for (depth, comment) in walk(&forest, c.limits().max_reply_depth) {
        let indent = "  ".repeat(depth);
        let mine = match snapshot.vote_for(&comment.id) {
            Some(UserVote::Up) => " [upvoted]",
            Some(UserVote::Down) => " [downvoted]",
            None => "",
        };
        println!(
            "{indent}{} {} at {} (+{}/-{}){mine}",
            comment.id,
            comment.author,
            comment.timestamp.format("%Y-%m-%d %H:%M"),
            comment.upvotes,
            comment.downvotes,
        );
        println!("{indent}  {}", comment.content);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    match &opt.cmd {
        Command::Topic { question } => {
            println!("{}", topic_for(&opt, question));
        }
        Command::List {
            question,
            sort,
            json,
        } => {
            let c = open(&opt, question)?;
            let kind = sort.unwrap_or_else(|| c.sort_preference());
            match json {
                true => println!(
                    "{}",
                    serde_json::to_string_pretty(&c.tree(kind)).context("serializing thread")?
                ),
                false => print_thread(&c, kind),
            }
        }
        Command::Post {
            question,
            content,
            author,
            reply_to,
        } => {
            let mut c = open(&opt, question)?;
            let new = NewComment {
                content: content.clone(),
                author: author.clone(),
                parent_id: reply_to.as_deref().map(CommentId::from),
            };
            let id = c.create(new).context("posting comment")?;
            tracing::info!(topic = %c.topic(), %id, "posted comment");
            println!("{id}");
        }
        Command::Edit {
            question,
            id,
            content,
            author,
        } => {
            let mut c = open(&opt, question)?;
            c.edit(&CommentId::from(id.as_str()), content, author.as_deref())
                .with_context(|| format!("editing comment {id}"))?;
            tracing::info!(topic = %c.topic(), %id, "edited comment");
        }
        Command::Delete { question, id } => {
            let mut c = open(&opt, question)?;
            c.delete(&CommentId::from(id.as_str()))
                .with_context(|| format!("deleting comment {id}"))?;
            tracing::info!(topic = %c.topic(), %id, "deleted comment");
        }
        Command::Vote { question, id, vote } => {
            let mut c = open(&opt, question)?;
            let res = c
                .vote(&CommentId::from(id.as_str()), *vote)
                .with_context(|| format!("voting on comment {id}"))?;
            tracing::info!(topic = %c.topic(), %id, vote = ?res, "voted");
            match res {
                Some(v) => println!("{v}"),
                None => println!("none"),
            }
        }
        Command::Sort { question, kind } => {
            let mut c = open(&opt, question)?;
            match kind {
                Some(k) => {
                    c.set_sort_preference(*k).context("saving sort preference")?;
                    tracing::info!(topic = %c.topic(), sort = %k, "saved sort preference");
                }
                None => println!("{}", c.sort_preference()),
            }
        }
    }

    Ok(())
}
