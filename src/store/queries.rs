//! GROQ queries sent to the content lake

/// Every post with the fields needed for a home page card
pub const ALL_POSTS: &str = r#"*[_type == "post"]{
  _id,
  title,
  slug,
  mainImage,
  _createdAt,
  description,
  author->{
    name,
    image
  }
}"#;

/// One post by `$slug`, joined with its approved comments
pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0]{
  _id,
  _createdAt,
  title,
  author->{
    name,
    image
  },
  'comments': *[
    _type == "comment" &&
    post._ref == ^._id &&
    Approved == true
  ],
  description,
  mainImage,
  slug,
  body
}"#;

/// Slugs of every post
pub const ALL_SLUGS: &str = r#"*[_type == "post"]{
  _id,
  slug {
    current
  }
}"#;
