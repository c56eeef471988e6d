use clap::{Parser, Subcommand};
use feed_client::{FeedApi, FeedClient, FeedFilters, NewPost, Profile, ProfileUpdate};

#[derive(Parser, Debug)]
#[command(about = "Browse and post to the social feed")]
struct Cli {
    #[arg(short, long, env = "FEED_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Bearer token for write and own-profile commands.
    #[arg(short, long, env = "FEED_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One page of the feed.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        visibility: Option<String>,
        /// Repeat to require several tags.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        author: Option<i64>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        order: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    Get {
        id: i64,
    },
    Categories,
    PopularTags {
        #[arg(long)]
        limit: Option<u32>,
    },
    Comments {
        post_id: i64,
    },
    Create {
        #[arg(long)]
        content: String,
        #[arg(long)]
        media_url: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        visibility: Option<String>,
    },
    Like {
        id: i64,
    },
    Comment {
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Someone's public profile.
    Profile {
        user_id: i64,
    },
    /// Your own profile.
    Me,
    /// Edit your profile. Pass an empty value to clear a field.
    UpdateProfile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        education: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        social_links: Option<String>,
    },
}

fn print_profile(profile: &Profile) {
    println!("{} (user {})", profile, profile.user.name);
    let fields = [
        ("job title", &profile.job_title),
        ("company", &profile.company),
        ("location", &profile.location),
        ("bio", &profile.bio),
        ("skills", &profile.skills),
        ("experience", &profile.experience),
        ("education", &profile.education),
        ("links", &profile.social_links),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {}: {}", label, value);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client = FeedClient::connect(&args.server)?;
    if let Some(token) = args.token {
        client = client.with_token(token);
    }

    match args.command {
        Command::List {
            search,
            category,
            visibility,
            tags,
            author,
            sort,
            order,
            page,
            per_page,
        } => {
            let mut filters = FeedFilters::new().page(page, per_page);
            if let Some(search) = search {
                filters = filters.search(search);
            }
            if let Some(category) = category {
                filters = filters.category(category);
            }
            if let Some(visibility) = visibility {
                filters = filters.visibility(visibility);
            }
            if let Some(author) = author {
                filters = filters.author(author);
            }
            if let Some(sort) = sort {
                filters = filters.sort(sort);
            }
            if let Some(order) = order {
                filters = filters.order(order);
            }
            for tag in tags {
                filters = filters.tag(tag);
            }

            let feed = client.list_posts(&filters).await?;
            println!(
                "Posts {} of {} (page {}, {} per page)",
                feed.posts.len(),
                feed.total,
                feed.page,
                feed.per_page
            );
            for post in feed.posts {
                println!("- {}", post);
            }
        }
        Command::Get { id } => {
            let post = client.get_post(id).await?;
            println!("{}", post);
            if !post.tags.is_empty() {
                println!("  tags: {}", post.tags.join(", "));
            }
            for comment in post.comments {
                println!("  {}", comment);
            }
        }
        Command::Categories => {
            for category in client.categories().await? {
                println!("{}", category);
            }
        }
        Command::PopularTags { limit } => {
            for tag in client.popular_tags(limit).await? {
                println!("{}", tag);
            }
        }
        Command::Comments { post_id } => {
            for comment in client.comments(post_id).await? {
                println!("{}", comment);
            }
        }
        Command::Create {
            content,
            media_url,
            tags,
            category,
            visibility,
        } => {
            let post = client
                .create_post(&NewPost {
                    content,
                    media_url,
                    tags,
                    category,
                    visibility,
                })
                .await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Like { id } => {
            let likes = client.like_post(id).await?;
            println!("Post {} now has {} likes", id, likes);
        }
        Command::Comment { post_id, content } => {
            let comment = client.add_comment(post_id, &content).await?;
            println!("Comment added! ID: {}", comment.id);
        }
        Command::Profile { user_id } => {
            print_profile(&client.user_profile(user_id).await?);
        }
        Command::Me => {
            print_profile(&client.my_profile().await?);
        }
        Command::UpdateProfile {
            first_name,
            last_name,
            bio,
            location,
            skills,
            experience,
            education,
            job_title,
            company,
            social_links,
        } => {
            let profile = client
                .update_profile(&ProfileUpdate {
                    first_name,
                    last_name,
                    bio,
                    location,
                    skills,
                    experience,
                    education,
                    job_title,
                    company,
                    social_links,
                })
                .await?;
            println!("Profile updated!");
            print_profile(&profile);
        }
    }

    Ok(())
}
