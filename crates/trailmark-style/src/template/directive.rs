//! Directive syntax: `category:argument` bodies and their arguments.

use crate::SyntaxReason;

const FONT_SIZE: &str = "font_size";

/// A parsed directive body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    /// `setting:<key>`
    Setting(SettingKey),
    /// `color:<scheme key>`
    Color(&'a str),
    /// `platform_wml:<windows>|<mac>|<linux>`
    Platform([&'a str; 3]),
}

impl<'a> Directive<'a> {
    /// Parse the text between `<` and `>`.
    pub(crate) fn parse(body: &'a str) -> Result<Self, SyntaxReason> {
        let mut parts = body.split(':');
        let (Some(category), Some(argument), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(SyntaxReason::MalformedDirective);
        };

        if category.is_empty() || argument.is_empty() {
            return Err(SyntaxReason::EmptyPart);
        }

        match category {
            "setting" => SettingKey::parse(argument).map(Self::Setting),
            "color" => Ok(Self::Color(argument)),
            "platform_wml" => {
                let fields: Vec<&str> = argument.split('|').collect();
                match fields.as_slice() {
                    [windows, mac, linux] => Ok(Self::Platform([*windows, *mac, *linux])),
                    _ => Err(SyntaxReason::PlatformArity(fields.len())),
                }
            }
            other => Err(SyntaxReason::UnknownCategory(other.to_string())),
        }
    }
}

/// The settings a `setting` directive can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingKey {
    /// Base font size with an optional arithmetic modifier.
    FontSize(Option<FontSizeModifier>),
    /// Configured font family name.
    FontName,
    /// GUI resource directory.
    GuiPath,
}

impl SettingKey {
    fn parse(argument: &str) -> Result<Self, SyntaxReason> {
        if let Some(index) = argument.find(FONT_SIZE) {
            let rest = &argument[index + FONT_SIZE.len()..];
            return FontSizeModifier::parse(rest).map(Self::FontSize);
        }

        match argument {
            "font_name" => Ok(Self::FontName),
            "gui_path" => Ok(Self::GuiPath),
            other => Err(SyntaxReason::UnknownSetting(other.to_string())),
        }
    }
}

/// Arithmetic applied to the base font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    /// Operators in the order they are looked for. The first one present wins.
    pub(crate) const PRIORITY: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    pub(crate) const fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Apply to `base`. Division truncates toward zero.
    pub(crate) fn apply(&self, base: i32, operand: i32) -> Result<i32, SyntaxReason> {
        let result = match self {
            Self::Add => base.checked_add(operand),
            Self::Subtract => base.checked_sub(operand),
            Self::Multiply => base.checked_mul(operand),
            Self::Divide => {
                if operand == 0 {
                    return Err(SyntaxReason::DivisionByZero);
                }
                base.checked_div(operand)
            }
        };
        result.ok_or(SyntaxReason::Overflow)
    }
}

/// `<op><integer>` following `font_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FontSizeModifier {
    pub(crate) op: ArithmeticOp,
    pub(crate) operand: i32,
}

impl FontSizeModifier {
    /// Parse the text after `font_size`. No operator means no modifier.
    fn parse(rest: &str) -> Result<Option<Self>, SyntaxReason> {
        for op in ArithmeticOp::PRIORITY {
            if let Some(position) = rest.find(op.symbol()) {
                let text = &rest[position + op.symbol().len_utf8()..];
                let operand = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| SyntaxReason::InvalidOperand(text.to_string()))?;
                return Ok(Some(Self { op, operand }));
            }
        }
        Ok(None)
    }

    pub(crate) fn apply(&self, base: i32) -> Result<i32, SyntaxReason> {
        self.op.apply(base, self.operand)
    }
}
