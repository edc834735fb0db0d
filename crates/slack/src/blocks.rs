use serde::Serialize;

pub const IMPRESSION_BLOCK_ID: &str = "impression_input";
pub const IMPRESSION_ACTION_ID: &str = "impression_value";

const IMPRESSION_TITLE: &str = "So you're here to give an honest impression?";
const IMPRESSION_LABEL: &str = "nice... please be honest (but not rude) and keep in mind that even though you're anon, this will be reviewed!";
const IMPRESSION_PLACEHOLDER: &str = "[impression here?]";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput {
        action_id: String,
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<TextObject>,
    },
}

impl InputElement {
    pub fn action_id(&self) -> &str {
        match self {
            Self::PlainTextInput { action_id, .. } => action_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Input { block_id: String, label: TextObject, element: InputElement },
}

/// A view surface accepted by `views.open`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum View {
    Modal {
        title: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        submit: Option<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        close: Option<TextObject>,
        blocks: Vec<Block>,
    },
}

impl View {
    pub fn blocks(&self) -> &[Block] {
        match self {
            Self::Modal { blocks, .. } => blocks,
        }
    }
}

pub struct ModalBuilder {
    title: TextObject,
    submit: Option<TextObject>,
    close: Option<TextObject>,
    blocks: Vec<Block>,
}

impl ModalBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: TextObject::plain(title), submit: None, close: None, blocks: Vec::new() }
    }

    pub fn submit(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(TextObject::plain(label));
        self
    }

    pub fn close(mut self, label: impl Into<String>) -> Self {
        self.close = Some(TextObject::plain(label));
        self
    }

    pub fn text_input<F>(
        mut self,
        block_id: impl Into<String>,
        label: impl Into<String>,
        build: F,
    ) -> Self
    where
        F: FnOnce(&mut TextInputBuilder),
    {
        let mut builder = TextInputBuilder::default();
        build(&mut builder);
        self.blocks.push(Block::Input {
            block_id: block_id.into(),
            label: TextObject::plain(label),
            element: builder.build(),
        });
        self
    }

    pub fn build(self) -> View {
        View::Modal {
            title: self.title,
            submit: self.submit,
            close: self.close,
            blocks: self.blocks,
        }
    }
}

#[derive(Default)]
pub struct TextInputBuilder {
    action_id: String,
    multiline: bool,
    placeholder: Option<TextObject>,
}

impl TextInputBuilder {
    pub fn action_id(&mut self, action_id: impl Into<String>) -> &mut Self {
        self.action_id = action_id.into();
        self
    }

    pub fn multiline(&mut self) -> &mut Self {
        self.multiline = true;
        self
    }

    pub fn placeholder(&mut self, text: impl Into<String>) -> &mut Self {
        self.placeholder = Some(TextObject::plain(text));
        self
    }

    fn build(self) -> InputElement {
        InputElement::PlainTextInput {
            action_id: self.action_id,
            multiline: self.multiline,
            placeholder: self.placeholder,
        }
    }
}

/// The modal opened by the impression shortcut. Its block and action ids are
/// the lookup path used when the submission comes back.
pub fn impression_modal() -> View {
    ModalBuilder::new(IMPRESSION_TITLE)
        .submit("Submit")
        .close("Cancel")
        .text_input(IMPRESSION_BLOCK_ID, IMPRESSION_LABEL, |input| {
            input.action_id(IMPRESSION_ACTION_ID).multiline().placeholder(IMPRESSION_PLACEHOLDER);
        })
        .build()
}
